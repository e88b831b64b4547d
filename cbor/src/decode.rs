/*!
The scanner: turns a byte buffer into [`Scanned`] trees, one top-level item per call.

The scanner accepts any well-formed CBOR, including floats and
indefinite-length framing; judging the result against the DAG-CBOR profile is
the job of [`validate`](crate::validate).
*/

use super::*;
use alloc::{boxed::Box, string::String, vec::Vec};
use thiserror::Error;

pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Not enough data for encoded value")]
    NotEnoughData,

    #[error("Invalid minor-type value {0}")]
    InvalidMinorValue(u8),

    #[error("Invalid simple value {0}")]
    InvalidSimple(u8),

    #[error("Chunked string contains an invalid chunk")]
    InvalidChunk,

    #[error("Map has a key with no value")]
    PartialMap,

    #[error("Unexpected break outside an indefinite-length item")]
    UnexpectedBreak,

    #[error("Declared length {0} is too large")]
    TooLong(u64),

    #[error("Maximum nesting depth exceeded")]
    MaxRecursion,

    #[error(transparent)]
    InvalidUtf8(#[from] core::str::Utf8Error),
}

/// Scanner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Deepest container nesting accepted before the scan is abandoned
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A cursor over a single buffer.
pub struct Scanner<'a> {
    data: &'a [u8],
    offset: usize,
    max_depth: usize,
    path: Path,
}

impl<'a> Scanner<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_options(data, &Options::default())
    }

    pub fn with_options(data: &'a [u8], options: &Options) -> Self {
        Self {
            data,
            offset: 0,
            max_depth: options.max_depth,
            path: Path::new(),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Scans the next top-level item.
    ///
    /// Returns [`Scanned::Absent`] once the buffer is exhausted. On failure
    /// the cursor position is unspecified and the scanner should be dropped.
    pub fn scan(&mut self) -> Result<Scanned, crate::Error> {
        self.path = Path::new();
        self.scan_item(0).map_err(|source| crate::Error::Malformed {
            path: core::mem::take(&mut self.path),
            source,
        })
    }

    fn read_byte(&mut self) -> Result<u8, Error> {
        let b = *self.data.get(self.offset).ok_or(Error::NotEnoughData)?;
        self.offset += 1;
        Ok(b)
    }

    fn read_slice(&mut self, len: u64) -> Result<&'a [u8], Error> {
        let remaining = self.data.len() - self.offset;
        if len > remaining as u64 {
            return Err(Error::NotEnoughData);
        }
        let start = self.offset;
        self.offset += len as usize;
        Ok(&self.data[start..self.offset])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let s = self.read_slice(N as u64)?;
        let mut b = [0u8; N];
        b.copy_from_slice(s);
        Ok(b)
    }

    fn read_uint_minor(&mut self, minor: u8) -> Result<(u64, Width), Error> {
        let width = Width::from_minor(minor).ok_or(Error::InvalidMinorValue(minor))?;
        let val = match width {
            Width::Inline => minor as u64,
            Width::One => self.read_byte()? as u64,
            Width::Two => u16::from_be_bytes(self.read_array()?) as u64,
            Width::Four => u32::from_be_bytes(self.read_array()?) as u64,
            Width::Eight => u64::from_be_bytes(self.read_array()?),
        };
        Ok((val, width))
    }

    /// Reads a definite length that must fit in the remaining buffer
    fn read_length(&mut self, minor: u8, item_size: usize) -> Result<(usize, Width), Error> {
        let (len, width) = self.read_uint_minor(minor)?;
        let remaining = (self.data.len() - self.offset) as u64;
        if len > remaining / item_size as u64 {
            if usize::try_from(len).is_err() {
                return Err(Error::TooLong(len));
            }
            return Err(Error::NotEnoughData);
        }
        Ok((len as usize, width))
    }

    fn read_chunks(&mut self, major: Major) -> Result<Vec<u8>, Error> {
        let mut data = Vec::new();
        loop {
            let op = Opcode::from_byte(self.read_byte()?);
            if op.to_byte() == 0xFF {
                break Ok(data);
            }
            if op.major != major || op.minor == 31 {
                break Err(Error::InvalidChunk);
            }
            let (len, _) = self.read_uint_minor(op.minor)?;
            let chunk = self.read_slice(len)?;
            if major == Major::Text {
                core::str::from_utf8(chunk)?;
            }
            data.extend_from_slice(chunk);
        }
    }

    fn scan_item(&mut self, depth: usize) -> Result<Scanned, Error> {
        if self.is_empty() {
            return Ok(Scanned::Absent);
        }
        let start = self.offset;
        let op = Opcode::from_byte(self.read_byte()?);
        tracing::trace!("Scanning {:?} at offset {start}", op);

        let literal = match (op.major, op.minor) {
            (Major::Unsigned, minor) => {
                let (v, w) = self.read_uint_minor(minor)?;
                Literal::Unsigned(v, w)
            }
            (Major::Negative, minor) => {
                let (v, w) = self.read_uint_minor(minor)?;
                Literal::Negative(v, w)
            }
            (Major::Bytes, 31) => Literal::Bytes {
                data: self.read_chunks(Major::Bytes)?,
                width: Width::Inline,
                chunked: true,
            },
            (Major::Bytes, minor) => {
                let (len, width) = self.read_uint_minor(minor)?;
                Literal::Bytes {
                    data: self.read_slice(len)?.to_vec(),
                    width,
                    chunked: false,
                }
            }
            (Major::Text, 31) => {
                let data = self.read_chunks(Major::Text)?;
                Literal::Text {
                    text: String::from_utf8(data).map_err(|e| e.utf8_error())?,
                    width: Width::Inline,
                    chunked: true,
                }
            }
            (Major::Text, minor) => {
                let (len, width) = self.read_uint_minor(minor)?;
                Literal::Text {
                    text: core::str::from_utf8(self.read_slice(len)?)?.into(),
                    width,
                    chunked: false,
                }
            }
            (Major::Array, minor) => return self.scan_array(minor, depth),
            (Major::Map, minor) => return self.scan_map(minor, depth),
            (Major::Tag, minor) => {
                let (tag, width) = self.read_uint_minor(minor)?;
                if depth >= self.max_depth {
                    return Err(Error::MaxRecursion);
                }
                let value = self.scan_nested(depth + 1)?;
                if value.is_break() {
                    return Err(Error::UnexpectedBreak);
                }
                return Ok(Scanned::Tagged {
                    tag,
                    width,
                    value: Box::new(value),
                });
            }
            (Major::Simple, 20) => Literal::Bool(false),
            (Major::Simple, 21) => Literal::Bool(true),
            (Major::Simple, 22 | 23) => Literal::Null,
            (Major::Simple, v @ 0..=19) => Literal::Simple(v),
            (Major::Simple, 24) => match self.read_byte()? {
                v if v < 32 => return Err(Error::InvalidSimple(v)),
                v => Literal::Simple(v),
            },
            (Major::Simple, 25) => Literal::Half(self.read_array()?),
            (Major::Simple, 26) => Literal::Single(self.read_array()?),
            (Major::Simple, 27) => Literal::Double(self.read_array()?),
            (Major::Simple, 31) => Literal::Break,
            (Major::Simple, _) => return Ok(Scanned::Absent),
        };
        Ok(Scanned::Literal(literal))
    }

    /// Scans a child item, treating end of input as truncation
    fn scan_nested(&mut self, depth: usize) -> Result<Scanned, Error> {
        if self.is_empty() {
            return Err(Error::NotEnoughData);
        }
        self.scan_item(depth)
    }

    fn scan_array(&mut self, minor: u8, depth: usize) -> Result<Scanned, Error> {
        if depth >= self.max_depth {
            return Err(Error::MaxRecursion);
        }
        let mut items = Vec::new();
        if minor == 31 {
            loop {
                self.path.push(PathSegment::Index(items.len()));
                let item = self.scan_nested(depth + 1)?;
                self.path.pop();
                if item.is_break() {
                    break;
                }
                items.push(item);
            }
            return Ok(Scanned::Array {
                items,
                width: Width::Inline,
                indefinite: true,
            });
        }

        let (count, width) = self.read_length(minor, 1)?;
        items.reserve(count);
        for idx in 0..count {
            self.path.push(PathSegment::Index(idx));
            let item = self.scan_nested(depth + 1)?;
            if item.is_break() {
                return Err(Error::UnexpectedBreak);
            }
            self.path.pop();
            items.push(item);
        }
        Ok(Scanned::Array {
            items,
            width,
            indefinite: false,
        })
    }

    fn scan_map(&mut self, minor: u8, depth: usize) -> Result<Scanned, Error> {
        if depth >= self.max_depth {
            return Err(Error::MaxRecursion);
        }
        let indefinite = minor == 31;
        let (count, width) = if indefinite {
            (None, Width::Inline)
        } else {
            let (count, width) = self.read_length(minor, 2)?;
            (Some(count), width)
        };
        let mut entries = Vec::with_capacity(count.unwrap_or(0));
        while count.is_none_or(|c| entries.len() < c) {
            self.path.push(PathSegment::Index(entries.len()));
            let key = self.scan_nested(depth + 1)?;
            self.path.pop();
            if key.is_break() {
                if indefinite {
                    break;
                }
                return Err(Error::UnexpectedBreak);
            }

            self.path.push(match key.as_literal().and_then(Literal::as_str) {
                Some(k) => PathSegment::Key(k.into()),
                None => PathSegment::Index(entries.len()),
            });
            let value = self.scan_nested(depth + 1)?;
            if value.is_break() {
                return Err(if indefinite {
                    Error::PartialMap
                } else {
                    Error::UnexpectedBreak
                });
            }
            self.path.pop();
            entries.push((key, value));
        }
        Ok(Scanned::Map {
            entries,
            width,
            indefinite,
        })
    }
}

/// Scans exactly one item from the front of `data`, returning it and the number of bytes consumed.
pub fn scan(data: &[u8]) -> Result<(Scanned, usize), crate::Error> {
    let mut scanner = Scanner::new(data);
    let value = scanner.scan()?;
    Ok((value, scanner.offset()))
}
