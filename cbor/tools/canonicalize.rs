/*!
Canonicalize command - re-encode DAG-CBOR in canonical form
*/

use super::io::{Input, Output};
use clap::Parser;
use dag_cbor::ToCbor;

/// Re-encode a DAG-CBOR item canonically
#[derive(Parser, Debug)]
#[command(
    about = "Re-encode DAG-CBOR in canonical form",
    long_about = "Decode a DAG-CBOR item under the default (lenient) checks, then write it \
                  back with minimal-width headers and canonically ordered map keys."
)]
pub struct Command {
    /// Fail instead of rewriting if the input is not already canonical
    #[arg(long)]
    check: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let data = self.input.read_all()?;
        let value = dag_cbor::decode_value(&data)?;
        let canonical = dag_cbor::encode_value(&value.to_cbor()?);

        if self.check {
            if canonical != data {
                anyhow::bail!("{} is not in canonical form", self.input.filepath());
            }
            tracing::info!("{} is canonical", self.input.filepath());
            return Ok(());
        }

        if canonical.len() != data.len() {
            tracing::debug!(
                "Canonical form is {} bytes, input was {}",
                canonical.len(),
                data.len()
            );
        }

        self.output
            .unwrap_or(Output::Stdout)
            .write_all(&canonical)
    }
}
