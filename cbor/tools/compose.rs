/*!
Compose command - convert JSON to DAG-CBOR
*/

use crate::io::{Input, Output};
use anyhow::Context;
use base64::prelude::*;
use clap::Parser;
use dag_cbor::{Encodable, cid};

/// Convert JSON to DAG-CBOR binary
#[derive(Parser, Debug)]
#[command(
    about = "Convert JSON to DAG-CBOR binary",
    long_about = "Parse JSON and convert it to canonical DAG-CBOR.\n\n\
                  Objects of the form {\"/\": {\"bytes\": \"<base64>\"}} become byte strings, and \
                  {\"/\": \"f<hex>\"} becomes a CID link, mirroring the output of \
                  'inspect --format json'.\n\n\
                  Non-integral numbers are rejected, as DAG-CBOR forbids floats."
)]
pub struct Command {
    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input file (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let input_text = self.input.read_to_string()?;
        let json_value: serde_json::Value = serde_json::from_str(&input_text)
            .with_context(|| format!("Failed to parse {}", self.input.filepath()))?;

        let cbor_bytes = dag_cbor::encode_value(&json_to_cbor(json_value)?);

        let output = self.output.unwrap_or(Output::Stdout);
        output.write_all(&cbor_bytes)
    }
}

/// Convert a JSON value to an encodable tree
fn json_to_cbor(value: serde_json::Value) -> anyhow::Result<Encodable> {
    use serde_json::Value as J;

    Ok(match value {
        J::Null => Encodable::null(),
        J::Bool(b) => Encodable::bool(b),

        J::Number(n) => {
            if let Some(u) = n.as_u64() {
                Encodable::unsigned(u)
            } else if let Some(i) = n.as_i64() {
                Encodable::integer(i)
            } else {
                anyhow::bail!("Non-integral number {n} cannot be represented in DAG-CBOR")
            }
        }

        J::String(s) => Encodable::text(&s),

        J::Array(arr) => Encodable::Array(
            arr.into_iter()
                .map(json_to_cbor)
                .collect::<anyhow::Result<_>>()?,
        ),

        J::Object(mut obj) => {
            if obj.len() == 1
                && let Some(reserved) = obj.remove("/")
            {
                return reserved_to_cbor(reserved);
            }

            let mut pairs = Vec::with_capacity(obj.len());
            for (key, val) in obj {
                let val = json_to_cbor(val).with_context(|| format!("In key {key:?}"))?;
                pairs.push((Encodable::text(&key), val));
            }
            Encodable::map(pairs)
        }
    })
}

/// Convert the value of a lone `"/"` key
fn reserved_to_cbor(value: serde_json::Value) -> anyhow::Result<Encodable> {
    use serde_json::Value as J;

    match value {
        J::String(s) => {
            let hex = s
                .strip_prefix('f')
                .context("Only base16 ('f' prefixed) CID strings are supported")?;
            let raw = hex::decode(hex).context("Invalid base16 CID")?;
            Ok(cid::to_link(&cid::RawCid(raw))?)
        }
        J::Object(mut obj) if obj.len() == 1 => match obj.remove("bytes") {
            Some(J::String(b64)) => {
                let data = BASE64_STANDARD_NO_PAD
                    .decode(b64.trim_end_matches('='))
                    .context("Invalid base64 in bytes")?;
                Ok(Encodable::bytes(&data))
            }
            _ => anyhow::bail!("Expected {{\"bytes\": \"<base64>\"}} under \"/\""),
        },
        other => anyhow::bail!("Unsupported value under \"/\": {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose(json: &str) -> anyhow::Result<Vec<u8>> {
        Ok(dag_cbor::encode_value(&json_to_cbor(serde_json::from_str(
            json,
        )?)?))
    }

    #[test]
    fn test_compose_scalars() {
        assert_eq!(compose("null").unwrap(), [0xf6]);
        assert_eq!(compose("-1").unwrap(), [0x20]);
        assert_eq!(compose("18446744073709551615").unwrap()[0], 0x1b);
        assert!(compose("1.5").is_err());
    }

    #[test]
    fn test_compose_sorts_keys() {
        assert_eq!(
            compose(r#"{"b": 1, "a": 2}"#).unwrap(),
            [0xa2, 0x61, b'a', 0x02, 0x61, b'b', 0x01]
        );
    }

    #[test]
    fn test_compose_reserved() {
        assert_eq!(
            compose(r#"{"/": {"bytes": "AQID"}}"#).unwrap(),
            [0x43, 0x01, 0x02, 0x03]
        );
        assert_eq!(
            compose(r#"{"/": "f01711220"}"#).unwrap(),
            [0xd8, 0x2a, 0x45, 0x00, 0x01, 0x71, 0x12, 0x20]
        );
        assert!(compose(r#"{"/": "bafy"}"#).is_err());
        // Alongside other keys, "/" is an ordinary key
        assert_eq!(
            compose(r#"{"/": 1, "a": 2}"#).unwrap(),
            [0xa2, 0x61, b'/', 0x01, 0x61, b'a', 0x02]
        );
    }

    #[test]
    fn test_round_trip_through_inspect() {
        let json = r#"{"a":[-1,false,{"/":{"bytes":"AQID"}}],"link":{"/":"f01711220"}}"#;
        let cbor = compose(json).unwrap();
        let value = dag_cbor::decode_value(&cbor).unwrap();
        assert_eq!(crate::diag::to_json(&value).to_string(), json);
    }
}
