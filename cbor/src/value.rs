/*!
The two value trees that flow through the codec, and the header byte decomposition.

A [`Scanned`] tree is produced by the scanner and describes exactly what was on
the wire, including argument widths and indefinite-length framing, so that the
validator can judge it. An [`Encodable`] tree is produced by the mapper and
contains literals that are already rendered as minimal wire bytes; the writer
only ever chooses widths for the container headers it emits itself.
*/

use super::*;
use alloc::{boxed::Box, string::String, vec::Vec};

/// The 3-bit major type of a CBOR item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Major {
    Unsigned,
    Negative,
    Bytes,
    Text,
    Array,
    Map,
    Tag,
    Simple,
}

impl Major {
    pub const fn bits(self) -> u8 {
        match self {
            Self::Unsigned => 0,
            Self::Negative => 1,
            Self::Bytes => 2,
            Self::Text => 3,
            Self::Array => 4,
            Self::Map => 5,
            Self::Tag => 6,
            Self::Simple => 7,
        }
    }
}

/// A header byte split into major type and additional info.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub major: Major,
    pub minor: u8,
}

impl Opcode {
    pub const fn from_byte(b: u8) -> Self {
        let major = match b >> 5 {
            0 => Major::Unsigned,
            1 => Major::Negative,
            2 => Major::Bytes,
            3 => Major::Text,
            4 => Major::Array,
            5 => Major::Map,
            6 => Major::Tag,
            _ => Major::Simple,
        };
        Self {
            major,
            minor: b & 0x1F,
        }
    }

    pub const fn to_byte(self) -> u8 {
        (self.major.bits() << 5) | (self.minor & 0x1F)
    }
}

/// The width of the argument that followed a header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Width {
    /// Value carried in the additional info bits
    Inline,
    One,
    Two,
    Four,
    Eight,
}

impl Width {
    /// The narrowest width able to carry `val`
    pub const fn minimal(val: u64) -> Self {
        if val < 24 {
            Self::Inline
        } else if val <= u8::MAX as u64 {
            Self::One
        } else if val <= u16::MAX as u64 {
            Self::Two
        } else if val <= u32::MAX as u64 {
            Self::Four
        } else {
            Self::Eight
        }
    }

    pub(crate) const fn from_minor(minor: u8) -> Option<Self> {
        match minor {
            0..=23 => Some(Self::Inline),
            24 => Some(Self::One),
            25 => Some(Self::Two),
            26 => Some(Self::Four),
            27 => Some(Self::Eight),
            _ => None,
        }
    }

    /// Number of argument bytes following the header byte
    pub const fn len(self) -> usize {
        match self {
            Self::Inline => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    pub const fn is_minimal_for(self, val: u64) -> bool {
        self as u8 == Self::minimal(val) as u8
    }
}

/// A scalar item as it appeared on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Null,
    Bool(bool),
    Unsigned(u64, Width),
    /// Represents `-1 - n`
    Negative(u64, Width),
    Half([u8; 2]),
    Single([u8; 4]),
    Double([u8; 8]),
    /// `width` is that of the length header, [`Width::Inline`] when chunked
    Text {
        text: String,
        width: Width,
        chunked: bool,
    },
    Bytes {
        data: Vec<u8>,
        width: Width,
        chunked: bool,
    },
    /// An unassigned simple value
    Simple(u8),
    /// The 0xFF stop code, only meaningful inside an indefinite-length container
    Break,
}

impl Literal {
    /// Interprets the raw bytes of a float literal
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Half(b) => Some(half::f16::from_be_bytes(*b).into()),
            Self::Single(b) => Some(f32::from_be_bytes(*b).into()),
            Self::Double(b) => Some(f64::from_be_bytes(*b)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool(_) => "Boolean",
            Self::Unsigned(..) => "Unsigned Integer",
            Self::Negative(..) => "Negative Integer",
            Self::Half(_) | Self::Single(_) | Self::Double(_) => "Float",
            Self::Text { .. } => "Text String",
            Self::Bytes { .. } => "Byte String",
            Self::Simple(_) => "Simple Value",
            Self::Break => "Break",
        }
    }
}

/// A decoded item tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scanned {
    /// No item: end of input, or an unassigned major-7 encoding
    Absent,
    Literal(Literal),
    Array {
        items: Vec<Scanned>,
        width: Width,
        indefinite: bool,
    },
    Map {
        entries: Vec<(Scanned, Scanned)>,
        width: Width,
        indefinite: bool,
    },
    Tagged {
        tag: u64,
        width: Width,
        value: Box<Scanned>,
    },
}

impl Scanned {
    pub fn is_break(&self) -> bool {
        matches!(self, Self::Literal(Literal::Break))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Absent => "Absent",
            Self::Literal(l) => l.type_name(),
            Self::Array { .. } => "Array",
            Self::Map { .. } => "Map",
            Self::Tagged { .. } => "Tagged Value",
        }
    }
}

/// A tree ready for canonical serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encodable {
    /// Nothing to emit: drops a map entry it is the key or value of, and is
    /// written as null inside arrays and under tags
    Absent,
    /// Pre-rendered minimal wire bytes
    Literal(Vec<u8>),
    Array(Vec<Encodable>),
    /// Key/value pairs in insertion order, sorted by the writer
    Map(Vec<(Encodable, Encodable)>),
    /// The tag's own rendered header followed by the tagged item
    Tagged(Vec<u8>, Box<Encodable>),
}

impl Encodable {
    pub fn null() -> Self {
        Self::Literal(alloc::vec![0xF6])
    }

    pub fn bool(b: bool) -> Self {
        Self::Literal(alloc::vec![if b { 0xF5 } else { 0xF4 }])
    }

    pub fn unsigned(val: u64) -> Self {
        let mut v = Vec::new();
        encode::emit_uint_minor(&mut v, Major::Unsigned, val);
        Self::Literal(v)
    }

    /// Encodes `-1 - n`
    pub fn negative(n: u64) -> Self {
        let mut v = Vec::new();
        encode::emit_uint_minor(&mut v, Major::Negative, n);
        Self::Literal(v)
    }

    pub fn integer(val: i64) -> Self {
        if val >= 0 {
            Self::unsigned(val as u64)
        } else {
            Self::negative(!(val as u64))
        }
    }

    pub fn text(s: &str) -> Self {
        let mut v = Vec::with_capacity(s.len() + 9);
        encode::emit_uint_minor(&mut v, Major::Text, s.len() as u64);
        v.extend_from_slice(s.as_bytes());
        Self::Literal(v)
    }

    pub fn bytes(b: &[u8]) -> Self {
        let mut v = Vec::with_capacity(b.len() + 9);
        encode::emit_uint_minor(&mut v, Major::Bytes, b.len() as u64);
        v.extend_from_slice(b);
        Self::Literal(v)
    }

    /// Renders a finite float in its shortest lossless form.
    ///
    /// NaN and the infinities are rejected here, when first wrapped, rather
    /// than at serialization time.
    pub fn float(f: f64) -> Result<Self, encode::Error> {
        encode::render_float(f).map(Self::Literal)
    }

    pub fn tagged(tag: u64, value: Encodable) -> Self {
        let mut v = Vec::new();
        encode::emit_uint_minor(&mut v, Major::Tag, tag);
        Self::Tagged(v, Box::new(value))
    }

    pub fn map<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Encodable, Encodable)>,
    {
        Self::Map(pairs.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn opcode_split() {
        let op = Opcode::from_byte(0x9F);
        assert_eq!(op.major, Major::Array);
        assert_eq!(op.minor, 31);
        assert_eq!(op.to_byte(), 0x9F);
        assert_eq!(Opcode::from_byte(0xFF).major, Major::Simple);
    }

    #[test]
    fn minimal_width() {
        assert_eq!(Width::minimal(23), Width::Inline);
        assert_eq!(Width::minimal(24), Width::One);
        assert_eq!(Width::minimal(256), Width::Two);
        assert_eq!(Width::minimal(65536), Width::Four);
        assert_eq!(Width::minimal(u64::MAX), Width::Eight);
        assert!(!Width::Two.is_minimal_for(255));
    }

    #[test]
    fn float_bits() {
        assert_eq!(Literal::Half([0x3C, 0x00]).as_f64(), Some(1.0));
        assert_eq!(Literal::Single([0x47, 0xC3, 0x50, 0x00]).as_f64(), Some(100000.0));
        assert_eq!(Literal::Null.as_f64(), None);
    }
}
