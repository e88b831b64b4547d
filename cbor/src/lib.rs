#![no_std]
extern crate alloc;

pub mod cid;
pub mod codec;
pub mod decode;
pub mod encode;
pub mod error;
pub mod validate;
pub mod value;

pub use codec::{Bytes, FromCbor, ToCbor};
pub use error::{Error, ErrorKind, Path, PathSegment};
pub use value::{Encodable, Literal, Major, Opcode, Scanned, Width};

use alloc::vec::Vec;


#[cfg(test)]
mod encode_tests;

/// Configuration for [`decode_value_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    pub scan: decode::Options,
    pub validate: validate::Options,
}

/// Scans exactly one item from `data` and checks it against the DAG-CBOR profile.
pub fn decode_value(data: &[u8]) -> Result<Scanned, Error> {
    decode_value_with(data, &Options::default())
}

pub fn decode_value_with(data: &[u8], options: &Options) -> Result<Scanned, Error> {
    let mut scanner = decode::Scanner::with_options(data, &options.scan);
    let value = scanner.scan()?;
    if !scanner.is_empty() {
        return Err(Error::AdditionalData);
    }
    validate::validate_with(&value, &options.validate)?;
    Ok(value)
}

/// Renders an [`Encodable`] tree to canonical bytes.
pub fn encode_value(value: &Encodable) -> Vec<u8> {
    encode::write(value)
}

pub fn encode<T>(value: &T) -> Result<Vec<u8>, Error>
where
    T: ToCbor + ?Sized,
{
    Ok(encode::write(&value.to_cbor()?))
}

pub fn decode<T>(data: &[u8]) -> Result<T, Error>
where
    T: FromCbor,
{
    T::from_cbor(&decode_value(data)?)
}
