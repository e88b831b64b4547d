/*!
Inspect command - display CBOR data in various formats
*/

use super::diag;
use super::io::{Input, Output};
use clap::Parser;

/// Inspect and display CBOR data
#[derive(Parser, Debug)]
#[command(about = "Inspect and display CBOR information", long_about = None)]
pub struct Command {
    /// Output format
    #[arg(
        long,
        default_value = "diag",
        value_name = "FORMAT",
        help = "Output format: diag/diagnostic (human-readable), json (DAG-JSON style, lossy), hex"
    )]
    format: OutputFormat,

    /// Also check the item against the DAG-CBOR profile
    #[arg(long)]
    strict: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// CBOR Diagnostic Notation
    #[value(alias = "diagnostic")]
    Diag,
    /// JSON format (lossy - drops tags other than CID links)
    Json,
    /// Hexadecimal dump
    Hex,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let cbor_bytes = self.input.read_all()?;

        let output_text = match self.format {
            OutputFormat::Hex => hex::encode(&cbor_bytes),
            format => {
                // Plain scanning shows items the profile would refuse, such as floats
                let (value, len) = dag_cbor::decode::scan(&cbor_bytes)?;
                if len < cbor_bytes.len() {
                    tracing::warn!(
                        "{}: ignoring {} bytes after the first item",
                        self.input.filepath(),
                        cbor_bytes.len() - len
                    );
                }
                if self.strict {
                    dag_cbor::validate::validate(&value)?;
                }

                if format == OutputFormat::Json {
                    serde_json::to_string_pretty(&diag::to_json(&value))?
                } else {
                    diag::format_diag(&value)
                }
            }
        };

        let output = self.output.unwrap_or(Output::Stdout);
        output.write_str(&output_text)?;

        // Add newline for better terminal output
        if matches!(output, Output::Stdout) {
            println!();
        }

        Ok(())
    }
}
