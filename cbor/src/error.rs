/*!
The crate-level error type.

Each stage has its own error enum; this type wraps them together with the
[`Path`] from the root of the tree to the node that caused the failure.
*/

use super::*;
use alloc::{string::String, vec::Vec};
use core::fmt;
use thiserror::Error;

/// One step from a container to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

/// A route from the root of a value tree to one of its nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<PathSegment>);

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.0.push(segment)
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            match segment {
                PathSegment::Index(i) => write!(f, "/{i}")?,
                PathSegment::Key(k) => write!(f, "/{k:?}")?,
            }
        }
        Ok(())
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed wire bytes, or a construct forbidden by the DAG-CBOR profile
    StructuralCorruption,
    /// A value that cannot be represented under the profile
    ValueRejected,
    /// Input that exceeds what this implementation can process
    Fatal,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed CBOR at {path}: {source}")]
    Malformed {
        path: Path,
        source: decode::Error,
    },

    #[error("Invalid DAG-CBOR at {path}: {source}")]
    Invalid {
        path: Path,
        source: validate::Error,
    },

    #[error("Additional data after end of CBOR item")]
    AdditionalData,

    #[error(transparent)]
    Rejected(#[from] encode::Error),

    #[error("Expected {expected}, found {found} at {path}")]
    IncorrectType {
        path: Path,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Value out of range at {path}")]
    OutOfRange { path: Path },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Malformed {
                source: decode::Error::MaxRecursion | decode::Error::TooLong(_),
                ..
            }
            | Self::Invalid {
                source: validate::Error::MaxRecursion,
                ..
            } => ErrorKind::Fatal,
            Self::Malformed { .. }
            | Self::Invalid { .. }
            | Self::AdditionalData
            | Self::IncorrectType { .. } => ErrorKind::StructuralCorruption,
            Self::Rejected(_) | Self::OutOfRange { .. } => ErrorKind::ValueRejected,
        }
    }

    /// The location of the offending node, where one is known
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Malformed { path, .. }
            | Self::Invalid { path, .. }
            | Self::IncorrectType { path, .. }
            | Self::OutOfRange { path } => Some(path),
            Self::AdditionalData | Self::Rejected(_) => None,
        }
    }

    /// Prefixes the path of a nested error with the segment leading to it.
    pub(crate) fn within(mut self, segment: PathSegment) -> Self {
        if let Some(path) = match &mut self {
            Self::Malformed { path, .. }
            | Self::Invalid { path, .. }
            | Self::IncorrectType { path, .. }
            | Self::OutOfRange { path } => Some(path),
            Self::AdditionalData | Self::Rejected(_) => None,
        } {
            path.0.insert(0, segment);
        }
        self
    }

    pub(crate) fn incorrect_type(expected: &'static str, found: &Scanned) -> Self {
        Self::IncorrectType {
            path: Path::new(),
            expected,
            found: found.type_name(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::{string::ToString, vec};

    #[test]
    fn path_display() {
        assert_eq!(Path::new().to_string(), "/");
        let p = Path::from(vec![
            PathSegment::Index(0),
            PathSegment::Key("links".to_string()),
            PathSegment::Index(3),
        ]);
        assert_eq!(p.to_string(), "/0/\"links\"/3");
    }

    #[test]
    fn nested_paths_prepend() {
        let e = Error::incorrect_type("Boolean", &Scanned::Absent)
            .within(PathSegment::Index(2))
            .within(PathSegment::Key("a".to_string()));
        assert_eq!(e.path().unwrap().to_string(), "/\"a\"/2");
        assert_eq!(e.kind(), ErrorKind::StructuralCorruption);
    }
}
