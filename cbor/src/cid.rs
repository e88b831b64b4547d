/*!
Content identifier links.

Any type that can hand over its raw CID bytes is encoded as tag 42 wrapping a
byte string of those bytes behind a single identity-multibase prefix byte.
*/

use super::*;
use alloc::{boxed::Box, vec::Vec};

/// The CBOR tag reserved for CID links.
pub const CID_TAG: u64 = 42;

/// The identity multibase prefix carried before the binary CID.
pub const MULTIBASE_IDENTITY: u8 = 0x00;

/// Anything that can expose its binary content identifier.
pub trait AsCid {
    type Error: Into<Box<dyn core::error::Error + Send + Sync>>;

    fn cid_bytes(&self) -> Result<&[u8], Self::Error>;
}

/// Wraps `cid` as a tag 42 link.
pub fn to_link<C>(cid: &C) -> Result<Encodable, encode::Error>
where
    C: AsCid + ?Sized,
{
    let raw = cid.cid_bytes().map_err(|e| {
        let e = e.into();
        tracing::debug!("Failed to read CID bytes: {e}");
        encode::Error::InvalidCid(e)
    })?;

    let mut prefixed = Vec::with_capacity(raw.len() + 1);
    prefixed.push(MULTIBASE_IDENTITY);
    prefixed.extend_from_slice(raw);
    Ok(Encodable::tagged(CID_TAG, Encodable::bytes(&prefixed)))
}

/// Extracts the raw CID bytes from a decoded tag 42 link.
pub fn from_link(value: &Scanned) -> Result<&[u8], Error> {
    match value {
        Scanned::Tagged {
            tag: CID_TAG,
            value,
            ..
        } => match value.as_ref() {
            Scanned::Literal(Literal::Bytes { data, .. }) => match data.split_first() {
                Some((&MULTIBASE_IDENTITY, raw)) => Ok(raw),
                _ => Err(Error::Invalid {
                    path: Path::new(),
                    source: validate::Error::InvalidLink,
                }),
            },
            other => Err(Error::incorrect_type("Byte String", other)),
        },
        other => Err(Error::incorrect_type("CID Link", other)),
    }
}

/// Encodes any [`AsCid`] value as a link, bypassing its own encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link<C>(pub C);

impl<C: AsCid> ToCbor for Link<C> {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        to_link(&self.0)
    }
}

/// A binary CID held as opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawCid(pub Vec<u8>);

impl AsCid for RawCid {
    type Error = core::convert::Infallible;

    fn cid_bytes(&self) -> Result<&[u8], Self::Error> {
        Ok(&self.0)
    }
}

impl ToCbor for RawCid {
    fn to_cbor(&self) -> Result<Encodable, encode::Error> {
        to_link(self)
    }
}

impl FromCbor for RawCid {
    fn from_cbor(value: &Scanned) -> Result<Self, Error> {
        from_link(value).map(|raw| Self(raw.to_vec()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec;
    use hex_literal::hex;

    struct Broken;

    #[derive(Debug, thiserror::Error)]
    #[error("no digest available")]
    struct NoDigest;

    impl AsCid for Broken {
        type Error = NoDigest;

        fn cid_bytes(&self) -> Result<&[u8], Self::Error> {
            Err(NoDigest)
        }
    }

    #[test]
    fn link_layout() {
        let cid = RawCid(vec![0x01, 0x71, 0x12, 0x20]);
        assert_eq!(
            encode(&cid).unwrap(),
            hex!("d82a4500 01711220")
        );
    }

    #[test]
    fn link_round_trip() {
        let raw = hex!("01711220 deadbeef").to_vec();
        let bytes = encode(&Link(RawCid(raw.clone()))).unwrap();
        let decoded: RawCid = decode(&bytes).unwrap();
        assert_eq!(decoded.0, raw);
    }

    #[test]
    fn capability_failure() {
        assert!(matches!(
            to_link(&Broken),
            Err(encode::Error::InvalidCid(_))
        ));
        assert_eq!(
            encode(&Link(Broken)).unwrap_err().kind(),
            ErrorKind::ValueRejected
        );
    }

    #[test]
    fn missing_prefix() {
        // tag 42, bytes [0x01, 0x71]
        let e = decode::<RawCid>(&hex!("d82a420171")).unwrap_err();
        assert!(matches!(
            e,
            Error::Invalid {
                source: validate::Error::InvalidLink,
                ..
            }
        ));
        assert!(decode::<RawCid>(&hex!("d82b4100")).is_err());
    }
}
