/*!
DAG-CBOR profile checks over a freshly scanned tree.

The walk is read-only and stops at the first violation, reporting the path to
the offending node.
*/

use super::*;
use alloc::{string::String, vec::Vec};
use hashbrown::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Floating point values are not permitted")]
    Float,

    #[error("Break stop code outside an indefinite-length item")]
    Break,

    #[error("Indefinite-length {0} is not permitted")]
    Indefinite(&'static str),

    #[error("Unassigned simple value {0}")]
    Simple(u8),

    #[error("Missing or unassigned item")]
    Absent,

    #[error("Map keys must be text strings, found {0}")]
    NonStringKey(&'static str),

    #[error("Duplicate map key {0:?}")]
    DuplicateKey(String),

    #[error("Map key {0:?} is out of canonical order")]
    KeyOrder(String),

    #[error("Non-minimal encoding of {0}")]
    NotShortest(&'static str),

    #[error("Tag {0} is not permitted")]
    Tag(u64),

    #[error("Tag 42 must wrap a byte string starting with 0x00")]
    InvalidLink,

    #[error("Maximum nesting depth exceeded")]
    MaxRecursion,
}

/// Profile switches beyond the baseline rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Reject integers, tags and string lengths not written in their minimal width
    pub require_shortest: bool,
    /// Reject maps whose keys are not already in canonical order
    pub require_canonical_order: bool,
    /// Accept only well-formed CID links (tag 42) and no other tags
    pub links_only: bool,
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            require_shortest: false,
            require_canonical_order: false,
            links_only: false,
            max_depth: decode::DEFAULT_MAX_DEPTH,
        }
    }
}

impl Options {
    /// Every optional check enabled
    pub fn strict() -> Self {
        Self {
            require_shortest: true,
            require_canonical_order: true,
            links_only: true,
            ..Default::default()
        }
    }
}

/// Checks `value` against the DAG-CBOR profile with default options.
pub fn validate(value: &Scanned) -> Result<(), crate::Error> {
    validate_with(value, &Options::default())
}

pub fn validate_with(value: &Scanned, options: &Options) -> Result<(), crate::Error> {
    let mut v = Validator {
        options,
        path: Path::new(),
    };
    v.check(value, 0).map_err(|source| {
        tracing::debug!("Rejecting DAG-CBOR at {}: {source}", v.path);
        crate::Error::Invalid {
            path: v.path,
            source,
        }
    })
}

struct Validator<'a> {
    options: &'a Options,
    path: Path,
}

impl Validator<'_> {
    fn shortest(&self, width: Width, val: u64, what: &'static str) -> Result<(), Error> {
        if self.options.require_shortest && !width.is_minimal_for(val) {
            Err(Error::NotShortest(what))
        } else {
            Ok(())
        }
    }

    fn check_literal(&self, literal: &Literal) -> Result<(), Error> {
        match literal {
            Literal::Null | Literal::Bool(_) => Ok(()),
            Literal::Unsigned(v, w) | Literal::Negative(v, w) => self.shortest(*w, *v, "integer"),
            Literal::Half(_) | Literal::Single(_) | Literal::Double(_) => Err(Error::Float),
            Literal::Text { chunked: true, .. } => Err(Error::Indefinite("text string")),
            Literal::Bytes { chunked: true, .. } => Err(Error::Indefinite("byte string")),
            Literal::Text { text, width, .. } => self.shortest(*width, text.len() as u64, "length"),
            Literal::Bytes { data, width, .. } => self.shortest(*width, data.len() as u64, "length"),
            Literal::Simple(v) => Err(Error::Simple(*v)),
            Literal::Break => Err(Error::Break),
        }
    }

    fn check(&mut self, value: &Scanned, depth: usize) -> Result<(), Error> {
        if depth > self.options.max_depth {
            return Err(Error::MaxRecursion);
        }
        match value {
            Scanned::Absent => Err(Error::Absent),
            Scanned::Literal(literal) => self.check_literal(literal),
            Scanned::Array {
                indefinite: true, ..
            } => Err(Error::Indefinite("array")),
            Scanned::Map {
                indefinite: true, ..
            } => Err(Error::Indefinite("map")),
            Scanned::Array { items, width, .. } => {
                self.shortest(*width, items.len() as u64, "length")?;
                for (idx, item) in items.iter().enumerate() {
                    self.path.push(PathSegment::Index(idx));
                    self.check(item, depth + 1)?;
                    self.path.pop();
                }
                Ok(())
            }
            Scanned::Map { entries, width, .. } => {
                self.shortest(*width, entries.len() as u64, "length")?;
                self.check_map(entries, depth)
            }
            Scanned::Tagged { tag, width, value } => {
                self.shortest(*width, *tag, "tag")?;
                if self.options.links_only {
                    if *tag != cid::CID_TAG {
                        return Err(Error::Tag(*tag));
                    }
                    if !matches!(
                        value.as_ref(),
                        Scanned::Literal(Literal::Bytes { data, .. }) if data.first() == Some(&cid::MULTIBASE_IDENTITY)
                    ) {
                        return Err(Error::InvalidLink);
                    }
                }
                self.check(value, depth + 1)
            }
        }
    }

    fn check_map(&mut self, entries: &[(Scanned, Scanned)], depth: usize) -> Result<(), Error> {
        // Keys are compared by their canonical encoding, scoped to this map
        let mut seen: HashSet<Vec<u8>> = HashSet::with_capacity(entries.len());
        let mut previous: Option<Vec<u8>> = None;

        for (idx, (key, value)) in entries.iter().enumerate() {
            self.path.push(PathSegment::Index(idx));
            let text = match key {
                Scanned::Literal(literal @ Literal::Text { text, .. }) => {
                    self.check_literal(literal)?;
                    text
                }
                key => return Err(Error::NonStringKey(key.type_name())),
            };
            self.path.pop();

            let key_bytes = encode::write(&Encodable::text(text));
            if self.options.require_canonical_order
                && previous.as_ref().is_some_and(|prev| *prev > key_bytes)
            {
                self.path.push(PathSegment::Key(text.clone()));
                return Err(Error::KeyOrder(text.clone()));
            }
            if !seen.insert(key_bytes.clone()) {
                self.path.push(PathSegment::Key(text.clone()));
                return Err(Error::DuplicateKey(text.clone()));
            }
            previous = Some(key_bytes);

            self.path.push(PathSegment::Key(text.clone()));
            self.check(value, depth + 1)?;
            self.path.pop();
        }
        Ok(())
    }
}
