/*!
Rendering scanned items as diagnostic notation or JSON
*/

use base64::prelude::*;
use dag_cbor::{Literal, Scanned, cid};

/// Format a scanned item in CBOR diagnostic notation
///
/// Indefinite-length containers are shown as `[_ ...]` and `{_ ...}`, chunked
/// strings as `(_ ...)` with a single chunk, and floats keep their width as an
/// `_1`/`_2`/`_3` suffix so that nothing the profile rejects is hidden.
pub fn format_diag(value: &Scanned) -> String {
    match value {
        Scanned::Absent => "absent".to_string(),
        Scanned::Literal(l) => format_literal(l),
        Scanned::Array {
            items, indefinite, ..
        } => {
            let formatted: Vec<_> = items.iter().map(format_diag).collect();
            format!("[{}{}]", marker(*indefinite), formatted.join(", "))
        }
        Scanned::Map {
            entries,
            indefinite,
            ..
        } => {
            let formatted: Vec<_> = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", format_diag(k), format_diag(v)))
                .collect();
            format!("{{{}{}}}", marker(*indefinite), formatted.join(", "))
        }
        Scanned::Tagged { tag, value, .. } => format!("{tag}({})", format_diag(value)),
    }
}

fn marker(indefinite: bool) -> &'static str {
    if indefinite { "_ " } else { "" }
}

fn format_literal(literal: &Literal) -> String {
    match literal {
        Literal::Null => "null".to_string(),
        Literal::Bool(b) => b.to_string(),
        Literal::Unsigned(n, _) => n.to_string(),
        Literal::Negative(n, _) => (-1 - *n as i128).to_string(),
        Literal::Half(_) => format_float(literal.as_f64().unwrap_or_default(), "_1"),
        Literal::Single(_) => format_float(literal.as_f64().unwrap_or_default(), "_2"),
        Literal::Double(_) => format_float(literal.as_f64().unwrap_or_default(), "_3"),
        Literal::Text { text, chunked, .. } => {
            let s = format!("\"{}\"", escape_string(text));
            if *chunked { format!("(_ {s})") } else { s }
        }
        Literal::Bytes { data, chunked, .. } => {
            let s = format!("h'{}'", hex::encode(data));
            if *chunked { format!("(_ {s})") } else { s }
        }
        Literal::Simple(n) => format!("simple({n})"),
        Literal::Break => "break".to_string(),
    }
}

fn format_float(f: f64, suffix: &str) -> String {
    if f.is_nan() {
        format!("NaN{suffix}")
    } else if f.is_infinite() {
        if f.is_sign_positive() {
            format!("Infinity{suffix}")
        } else {
            format!("-Infinity{suffix}")
        }
    } else {
        format!("{f:?}{suffix}")
    }
}

/// Escape special characters in strings for diagnostic output
fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result
}

/// Convert a scanned item to JSON
///
/// Byte strings and CID links use the DAG-JSON reserved `"/"` key: bytes as
/// `{"/": {"bytes": <base64>}}` and links as `{"/": "f<hex>"}`, the base16
/// multibase form of the CID. Other tags are dropped, as are values JSON
/// cannot represent, which become `null`.
pub fn to_json(value: &Scanned) -> serde_json::Value {
    use serde_json::Value as J;

    match value {
        Scanned::Absent => J::Null,
        Scanned::Literal(l) => literal_to_json(l),
        Scanned::Array { items, .. } => J::Array(items.iter().map(to_json).collect()),
        Scanned::Map { entries, .. } => J::Object(
            entries
                .iter()
                .map(|(k, v)| {
                    let key = match k.as_literal().and_then(Literal::as_str) {
                        Some(s) => s.to_string(),
                        None => format_diag(k),
                    };
                    (key, to_json(v))
                })
                .collect(),
        ),
        Scanned::Tagged { .. } => match cid::from_link(value) {
            Ok(raw) => serde_json::json!({ "/": format!("f{}", hex::encode(raw)) }),
            Err(_) => match value {
                Scanned::Tagged { value, .. } => to_json(value),
                _ => J::Null,
            },
        },
    }
}

fn literal_to_json(literal: &Literal) -> serde_json::Value {
    use serde_json::Value as J;

    match literal {
        Literal::Null | Literal::Simple(_) | Literal::Break => J::Null,
        Literal::Bool(b) => J::Bool(*b),
        Literal::Unsigned(n, _) => J::from(*n),
        Literal::Negative(n, _) => match i64::try_from(*n) {
            Ok(n) => J::from(-1 - n),
            // Below i64::MIN, JSON numbers lose precision
            Err(_) => J::from(-1.0 - *n as f64),
        },
        Literal::Half(_) | Literal::Single(_) | Literal::Double(_) => literal
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map_or(J::Null, J::Number),
        Literal::Text { text, .. } => J::String(text.clone()),
        Literal::Bytes { data, .. } => {
            serde_json::json!({ "/": { "bytes": BASE64_STANDARD_NO_PAD.encode(data) } })
        }
    }
}
