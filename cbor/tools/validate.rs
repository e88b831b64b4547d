/*!
Validate command - check inputs against the DAG-CBOR profile
*/

use super::io::Input;
use clap::Parser;
use dag_cbor::{Options, validate};

/// Check one or more inputs against the DAG-CBOR profile
#[derive(Parser, Debug)]
#[command(
    about = "Check inputs against the DAG-CBOR profile",
    long_about = "Decode each input as exactly one DAG-CBOR item and report the first \
                  violation found, with the path to the offending item.\n\n\
                  Exits with an error if any input fails."
)]
pub struct Command {
    /// Reject integers, lengths and tags not written in their minimal width
    #[arg(long)]
    shortest: bool,

    /// Reject maps whose keys are not in canonical order
    #[arg(long)]
    canonical_order: bool,

    /// Reject every tag other than well-formed CID links
    #[arg(long)]
    links_only: bool,

    /// Enable all of the optional checks
    #[arg(long, conflicts_with_all = ["shortest", "canonical_order", "links_only"])]
    strict: bool,

    /// Maximum nesting depth
    #[arg(long, default_value_t = dag_cbor::decode::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Input files (use '-' for stdin)
    #[arg(required = true)]
    files: Vec<Input>,
}

impl Command {
    fn options(&self) -> Options {
        let mut validate = if self.strict {
            validate::Options::strict()
        } else {
            validate::Options {
                require_shortest: self.shortest,
                require_canonical_order: self.canonical_order,
                links_only: self.links_only,
                ..Default::default()
            }
        };
        validate.max_depth = self.max_depth;

        Options {
            scan: dag_cbor::decode::Options {
                max_depth: self.max_depth,
            },
            validate,
        }
    }

    pub fn exec(self) -> anyhow::Result<()> {
        let options = self.options();
        tracing::debug!("Validating with {options:?}");

        let mut failed = 0;
        for input in &self.files {
            let data = input.read_all()?;
            match dag_cbor::decode_value_with(&data, &options) {
                Ok(_) => println!("{}: OK", input.filepath()),
                Err(e) => {
                    failed += 1;
                    println!("{}: {:?}: {e}", input.filepath(), e.kind());
                }
            }
        }

        if failed > 0 {
            anyhow::bail!("{failed} of {} inputs failed validation", self.files.len());
        }
        Ok(())
    }
}
