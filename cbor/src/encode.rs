/*!
The canonical writer.

Arrays keep their order, map entries are sorted by the bytewise order of each
key's own canonical encoding, and every container header uses the shortest
definite-length form. Indefinite-length framing is never emitted.
*/

use super::*;
use alloc::{boxed::Box, vec::Vec};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Non-finite float {0} cannot be encoded")]
    NonFiniteFloat(f64),

    #[error("Failed to read content identifier: {0}")]
    InvalidCid(Box<dyn core::error::Error + Send + Sync>),

    #[error("Unsupported value: {0}")]
    Unsupported(&'static str),
}

pub(crate) fn emit_uint_minor(data: &mut Vec<u8>, major: Major, val: u64) {
    let major = major.bits() << 5;
    match Width::minimal(val) {
        Width::Inline => data.push(major | (val as u8)),
        Width::One => {
            data.push(major | 24u8);
            data.push(val as u8)
        }
        Width::Two => {
            data.push(major | 25u8);
            data.extend((val as u16).to_be_bytes())
        }
        Width::Four => {
            data.push(major | 26u8);
            data.extend((val as u32).to_be_bytes())
        }
        Width::Eight => {
            data.push(major | 27u8);
            data.extend(val.to_be_bytes())
        }
    }
}

fn lossless_float_coerce<T>(value: f64) -> Option<T>
where
    T: num_traits::FromPrimitive + Into<f64> + Copy,
{
    match <T as num_traits::FromPrimitive>::from_f64(value) {
        Some(f) if <T as Into<f64>>::into(f) == value => Some(f),
        _ => None,
    }
}

pub(crate) fn render_float(value: f64) -> Result<Vec<u8>, Error> {
    if !value.is_finite() {
        tracing::debug!("Rejecting non-finite float {value}");
        return Err(Error::NonFiniteFloat(value));
    }
    let mut data = Vec::with_capacity(9);
    if let Some(f) = lossless_float_coerce::<half::f16>(value) {
        data.push((7 << 5) | 25);
        data.extend(f.to_be_bytes())
    } else if let Some(f) = lossless_float_coerce::<f32>(value) {
        data.push((7 << 5) | 26);
        data.extend(f.to_be_bytes())
    } else {
        data.push((7 << 5) | 27);
        data.extend(value.to_be_bytes())
    }
    Ok(data)
}

/// Accumulates canonical output for one [`Encodable`] tree.
#[derive(Default)]
pub struct Writer {
    data: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn write(&mut self, value: &Encodable) {
        match value {
            Encodable::Absent => {}
            Encodable::Literal(bytes) => self.data.extend_from_slice(bytes),
            Encodable::Array(items) => {
                emit_uint_minor(&mut self.data, Major::Array, items.len() as u64);
                for item in items {
                    self.write_or_null(item);
                }
            }
            Encodable::Map(entries) => {
                let mut sorted = entries
                    .iter()
                    .filter(|(k, v)| {
                        !matches!(k, Encodable::Absent) && !matches!(v, Encodable::Absent)
                    })
                    .map(|(k, v)| (write(k), v))
                    .collect::<Vec<_>>();
                sorted.sort_by(|(a, _), (b, _)| a.cmp(b));

                emit_uint_minor(&mut self.data, Major::Map, sorted.len() as u64);
                for (key, value) in sorted {
                    self.data.extend(key);
                    self.write(value);
                }
            }
            Encodable::Tagged(tag, value) => {
                self.data.extend_from_slice(tag);
                self.write_or_null(value);
            }
        }
    }

    /// Writes `value`, standing in null where an item is required but absent
    fn write_or_null(&mut self, value: &Encodable) {
        match value {
            Encodable::Absent => self.data.push(0xF6),
            value => self.write(value),
        }
    }
}

/// Renders `value` to canonical bytes.
pub fn write(value: &Encodable) -> Vec<u8> {
    let mut w = Writer::new();
    w.write(value);
    w.build()
}
