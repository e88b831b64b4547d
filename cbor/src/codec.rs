/*!
The boundary between user types and the value trees.

Types implement [`ToCbor`] to produce an [`Encodable`] tree and [`FromCbor`]
to rebuild themselves from a validated [`Scanned`] tree.
*/

use super::*;
use alloc::{collections::BTreeMap, string::String, vec::Vec};

pub trait ToCbor {
    fn to_cbor(&self) -> Result<Encodable, encode::Error>;
}

pub trait FromCbor: Sized {
    fn from_cbor(value: &Scanned) -> Result<Self, Error>;
}

impl<T: ToCbor + ?Sized> ToCbor for &T {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        (**self).to_cbor()
    }
}

impl ToCbor for Encodable {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        Ok(self.clone())
    }
}

impl FromCbor for Scanned {
    fn from_cbor(value: &Scanned) -> Result<Self, Error> {
        Ok(value.clone())
    }
}

/// Re-encodes a decoded tree in canonical form.
///
/// Chunked strings are joined, integers and floats take their shortest form
/// and map keys are re-sorted by the writer.
impl ToCbor for Scanned {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        Ok(match self {
            Scanned::Absent => return Err(encode::Error::Unsupported("absent item")),
            Scanned::Literal(literal) => match literal {
                Literal::Null => Encodable::null(),
                Literal::Bool(b) => Encodable::bool(*b),
                Literal::Unsigned(v, _) => Encodable::unsigned(*v),
                Literal::Negative(n, _) => Encodable::negative(*n),
                Literal::Text { text, .. } => Encodable::text(text),
                Literal::Bytes { data, .. } => Encodable::bytes(data),
                Literal::Half(_) | Literal::Single(_) | Literal::Double(_) => {
                    Encodable::float(literal.as_f64().unwrap_or(f64::NAN))?
                }
                Literal::Simple(v) => {
                    let mut data = Vec::with_capacity(2);
                    encode::emit_uint_minor(&mut data, Major::Simple, *v as u64);
                    Encodable::Literal(data)
                }
                Literal::Break => return Err(encode::Error::Unsupported("break stop code")),
            },
            Scanned::Array { items, .. } => Encodable::Array(
                items
                    .iter()
                    .map(ToCbor::to_cbor)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Scanned::Map { entries, .. } => Encodable::Map(
                entries
                    .iter()
                    .map(|(k, v)| Ok::<_, encode::Error>((k.to_cbor()?, v.to_cbor()?)))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Scanned::Tagged { tag, value, .. } => Encodable::tagged(*tag, value.to_cbor()?),
        })
    }
}

macro_rules! impl_uint_cbor {
    ($($ty:ty),*) => {
        $(
            impl ToCbor for $ty {
                fn to_cbor(&self) -> Result<Encodable, encode::Error> {
                    Ok(Encodable::unsigned(*self as u64))
                }
            }

            impl FromCbor for $ty {
                fn from_cbor(value: &Scanned) -> Result<Self, Error> {
                    match value {
                        Scanned::Literal(Literal::Unsigned(v, _)) => {
                            <$ty>::try_from(*v).map_err(|_| Error::OutOfRange { path: Path::new() })
                        }
                        _ => Err(Error::incorrect_type("Unsigned Integer", value)),
                    }
                }
            }
        )*
    };
}

impl_uint_cbor!(u8, u16, u32, u64, usize);

macro_rules! impl_int_cbor {
    ($($ty:ty),*) => {
        $(
            impl ToCbor for $ty {
                fn to_cbor(&self) -> Result<Encodable, encode::Error> {
                    Ok(Encodable::integer(*self as i64))
                }
            }

            impl FromCbor for $ty {
                fn from_cbor(value: &Scanned) -> Result<Self, Error> {
                    let v = match value {
                        Scanned::Literal(Literal::Unsigned(v, _)) => i64::try_from(*v).ok(),
                        Scanned::Literal(Literal::Negative(n, _)) => {
                            i64::try_from(*n).ok().map(|n| -1 - n)
                        }
                        _ => return Err(Error::incorrect_type("Integer", value)),
                    };
                    v.and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or(Error::OutOfRange { path: Path::new() })
                }
            }
        )*
    };
}

impl_int_cbor!(i8, i16, i32, i64, isize);

impl ToCbor for f64 {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        Encodable::float(*self)
    }
}

impl ToCbor for f32 {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        Encodable::float(*self as f64)
    }
}

impl ToCbor for bool {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        Ok(Encodable::bool(*self))
    }
}

impl FromCbor for bool {
    fn from_cbor(value: &Scanned) -> Result<Self, Error> {
        match value {
            Scanned::Literal(Literal::Bool(b)) => Ok(*b),
            _ => Err(Error::incorrect_type("Boolean", value)),
        }
    }
}

impl ToCbor for str {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        Ok(Encodable::text(self))
    }
}

impl ToCbor for String {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        Ok(Encodable::text(self))
    }
}

impl FromCbor for String {
    fn from_cbor(value: &Scanned) -> Result<Self, Error> {
        match value {
            Scanned::Literal(Literal::Text { text, .. }) => Ok(text.clone()),
            _ => Err(Error::incorrect_type("Text String", value)),
        }
    }
}

/// A byte string, as opposed to an array of small integers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl ToCbor for Bytes {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        Ok(Encodable::bytes(&self.0))
    }
}

impl FromCbor for Bytes {
    fn from_cbor(value: &Scanned) -> Result<Self, Error> {
        match value {
            Scanned::Literal(Literal::Bytes { data, .. }) => Ok(Self(data.clone())),
            _ => Err(Error::incorrect_type("Byte String", value)),
        }
    }
}

impl<T: ToCbor> ToCbor for Option<T> {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        match self {
            Some(v) => v.to_cbor(),
            None => Ok(Encodable::null()),
        }
    }
}

impl<T: FromCbor> FromCbor for Option<T> {
    fn from_cbor(value: &Scanned) -> Result<Self, Error> {
        match value {
            Scanned::Literal(Literal::Null) => Ok(None),
            value => T::from_cbor(value).map(Some),
        }
    }
}

impl<T: ToCbor> ToCbor for [T] {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        self.iter()
            .map(ToCbor::to_cbor)
            .collect::<Result<Vec<_>, _>>()
            .map(Encodable::Array)
    }
}

impl<T: ToCbor> ToCbor for Vec<T> {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        self.as_slice().to_cbor()
    }
}

impl<T: FromCbor> FromCbor for Vec<T> {
    fn from_cbor(value: &Scanned) -> Result<Self, Error> {
        match value {
            Scanned::Array { items, .. } => items
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    T::from_cbor(item).map_err(|e| e.within(PathSegment::Index(idx)))
                })
                .collect(),
            _ => Err(Error::incorrect_type("Array", value)),
        }
    }
}

impl<T: ToCbor> ToCbor for BTreeMap<String, T> {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        self.iter()
            .map(|(k, v)| Ok::<_, encode::Error>((Encodable::text(k), v.to_cbor()?)))
            .collect::<Result<Vec<_>, _>>()
            .map(Encodable::Map)
    }
}

impl<T: FromCbor> FromCbor for BTreeMap<String, T> {
    fn from_cbor(value: &Scanned) -> Result<Self, Error> {
        match value {
            Scanned::Map { entries, .. } => entries
                .iter()
                .enumerate()
                .map(|(idx, (k, v))| {
                    let k = String::from_cbor(k).map_err(|e| e.within(PathSegment::Index(idx)))?;
                    let v = T::from_cbor(v).map_err(|e| e.within(PathSegment::Key(k.clone())))?;
                    Ok::<_, Error>((k, v))
                })
                .collect(),
            _ => Err(Error::incorrect_type("Map", value)),
        }
    }
}
