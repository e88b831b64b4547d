/*!
DAG-CBOR Tools - A CLI for working with DAG-CBOR data

# Commands

- `inspect`: Display CBOR data in various formats (diagnostic, JSON, hex)
- `validate`: Check files against the DAG-CBOR profile
- `canonicalize`: Re-encode valid DAG-CBOR in canonical form
- `compose`: Convert JSON to DAG-CBOR

# Examples

```bash
# Inspect a block in diagnostic notation
dagcbor inspect block.cbor

# Check several blocks, insisting on minimal encodings and sorted keys
dagcbor validate --shortest --canonical-order a.cbor b.cbor

# Round-trip through JSON
echo '{"name": "Alice", "age": 30}' | dagcbor compose - | dagcbor inspect --format json -
```
*/

use clap::{Parser, Subcommand};

mod canonicalize;
mod compose;
mod diag;
mod inspect;
mod io;
mod validate;

/// A CLI tool for working with DAG-CBOR data
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A CLI tool for inspecting, validating and producing DAG-CBOR data"
)]
struct Cli {
    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect and display CBOR data in various formats
    Inspect(inspect::Command),

    /// Check inputs against the DAG-CBOR profile
    Validate(validate::Command),

    /// Re-encode DAG-CBOR in canonical form
    Canonicalize(canonicalize::Command),

    /// Convert JSON to DAG-CBOR
    Compose(compose::Command),
}

fn init_logger(verbose: u8) {
    let log_level = match verbose {
        0 => tracing_subscriber::filter::LevelFilter::WARN,
        1 => tracing_subscriber::filter::LevelFilter::DEBUG,
        _ => tracing_subscriber::filter::LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(verbose > 0)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Inspect(args) => args.exec(),
        Commands::Validate(args) => args.exec(),
        Commands::Canonicalize(args) => args.exec(),
        Commands::Compose(args) => args.exec(),
    }
}
