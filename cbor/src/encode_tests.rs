use super::encode::*;
use super::{Encodable, encode};
use alloc::{collections::BTreeMap, string::String, vec, vec::Vec};
use hex_literal::hex;

#[test]
fn rfc_tests() {
    // RFC 8949, Appendix A:
    // https://www.rfc-editor.org/rfc/rfc8949.html#section-appendix.a

    assert_eq!(*encode(&0u64).unwrap(), hex!("00"));
    assert_eq!(*encode(&1u64).unwrap(), hex!("01"));
    assert_eq!(*encode(&10u64).unwrap(), hex!("0a"));
    assert_eq!(*encode(&23u64).unwrap(), hex!("17"));
    assert_eq!(*encode(&24u64).unwrap(), hex!("1818"));
    assert_eq!(*encode(&25u64).unwrap(), hex!("1819"));
    assert_eq!(*encode(&100u64).unwrap(), hex!("1864"));
    assert_eq!(*encode(&256u64).unwrap(), hex!("190100"));
    assert_eq!(*encode(&1000u64).unwrap(), hex!("1903e8"));
    assert_eq!(*encode(&1000000u64).unwrap(), hex!("1a000f4240"));
    assert_eq!(*encode(&1000000000000u64).unwrap(), hex!("1b000000e8d4a51000"));
    assert_eq!(*encode(&18446744073709551615u64).unwrap(), hex!("1bffffffffffffffff"));

    assert_eq!(*encode(&-1i64).unwrap(), hex!("20"));
    assert_eq!(*encode(&-10i64).unwrap(), hex!("29"));
    assert_eq!(*encode(&-100i64).unwrap(), hex!("3863"));
    assert_eq!(*encode(&-1000i64).unwrap(), hex!("3903e7"));
    assert_eq!(*write(&Encodable::negative(u64::MAX)), hex!("3bffffffffffffffff"));

    assert_eq!(*encode(&0.0f64).unwrap(), hex!("f90000"));
    assert_eq!(*encode(&-0.0f64).unwrap(), hex!("f98000"));
    assert_eq!(*encode(&1.0f64).unwrap(), hex!("f93c00"));
    assert_eq!(*encode(&1.1f64).unwrap(), hex!("fb3ff199999999999a"));
    assert_eq!(*encode(&1.5f64).unwrap(), hex!("f93e00"));
    assert_eq!(*encode(&65504.0f64).unwrap(), hex!("f97bff"));
    assert_eq!(*encode(&100000.0f64).unwrap(), hex!("fa47c35000"));
    assert_eq!(*encode(&3.4028234663852886e+38f64).unwrap(), hex!("fa7f7fffff"));
    assert_eq!(*encode(&1.0e+300f64).unwrap(), hex!("fb7e37e43c8800759c"));
    assert_eq!(*encode(&-4.1f64).unwrap(), hex!("fbc010666666666666"));

    assert_eq!(*encode(&false).unwrap(), hex!("f4"));
    assert_eq!(*encode(&true).unwrap(), hex!("f5"));
    assert_eq!(*write(&Encodable::null()), hex!("f6"));

    assert_eq!(
        *write(&Encodable::tagged(0, Encodable::text("2013-03-21T20:04:00Z"))),
        hex!("c074323031332d30332d32315432303a30343a30305a")
    );
    assert_eq!(
        *write(&Encodable::tagged(1, Encodable::unsigned(1363896240))),
        hex!("c11a514b67b0")
    );
    assert_eq!(
        *write(&Encodable::tagged(23, Encodable::bytes(&hex!("01020304")))),
        hex!("d74401020304")
    );
    assert_eq!(
        *write(&Encodable::tagged(32, Encodable::text("http://www.example.com"))),
        hex!("d82076687474703a2f2f7777772e6578616d706c652e636f6d")
    );

    assert_eq!(*write(&Encodable::bytes(&[])), hex!("40"));
    assert_eq!(*write(&Encodable::bytes(&hex!("01020304"))), hex!("4401020304"));
    assert_eq!(*encode("").unwrap(), hex!("60"));
    assert_eq!(*encode("a").unwrap(), hex!("6161"));
    assert_eq!(*encode("IETF").unwrap(), hex!("6449455446"));
    assert_eq!(*encode("\"\\").unwrap(), hex!("62225c"));
    assert_eq!(*encode("\u{00fc}").unwrap(), hex!("62c3bc"));
    assert_eq!(*encode("\u{6c34}").unwrap(), hex!("63e6b0b4"));
    assert_eq!(*encode("\u{10151}").unwrap(), hex!("64f0908591"));

    assert_eq!(*encode::<[u64]>(&[]).unwrap(), hex!("80"));
    assert_eq!(*encode(&[1u64, 2, 3][..]).unwrap(), hex!("83010203"));
    assert_eq!(
        *write(&Encodable::Array(vec![
            Encodable::unsigned(1),
            Encodable::Array(vec![Encodable::unsigned(2), Encodable::unsigned(3)]),
            Encodable::Array(vec![Encodable::unsigned(4), Encodable::unsigned(5)]),
        ])),
        hex!("8301820203820405")
    );
    assert_eq!(
        *encode(&(1u64..=25).collect::<Vec<_>>()).unwrap(),
        hex!("98190102030405060708090a0b0c0d0e0f101112131415161718181819")
    );

    assert_eq!(*write(&Encodable::Map(vec![])), hex!("a0"));
    assert_eq!(
        *write(&Encodable::map([
            (Encodable::unsigned(1), Encodable::unsigned(2)),
            (Encodable::unsigned(3), Encodable::unsigned(4)),
        ])),
        hex!("a201020304")
    );
    assert_eq!(
        *write(&Encodable::map([
            (Encodable::text("a"), Encodable::unsigned(1)),
            (
                Encodable::text("b"),
                Encodable::Array(vec![Encodable::unsigned(2), Encodable::unsigned(3)])
            ),
        ])),
        hex!("a26161016162820203")
    );
    assert_eq!(
        *write(&Encodable::map(
            ["a", "b", "c", "d", "e"]
                .into_iter()
                .zip(["A", "B", "C", "D", "E"])
                .map(|(k, v)| (Encodable::text(k), Encodable::text(v)))
        )),
        hex!("a56161614161626142616361436164614461656145")
    );
}

#[test]
fn non_finite_floats() {
    assert!(matches!(
        Encodable::float(f64::NAN),
        Err(Error::NonFiniteFloat(f)) if f.is_nan()
    ));
    assert!(matches!(
        Encodable::float(f64::INFINITY),
        Err(Error::NonFiniteFloat(_))
    ));
    assert!(matches!(
        encode(&f32::NEG_INFINITY),
        Err(crate::Error::Rejected(Error::NonFiniteFloat(_)))
    ));
}

#[test]
fn container_headers() {
    let array = |n: usize| write(&Encodable::Array(vec![Encodable::null(); n]));
    assert_eq!(array(23)[..1], hex!("97"));
    assert_eq!(array(24)[..2], hex!("9818"));
    assert_eq!(array(255)[..2], hex!("98ff"));
    assert_eq!(array(256)[..3], hex!("990100"));
    assert_eq!(array(65536)[..5], hex!("9a00010000"));

    let map = |n: usize| {
        write(&Encodable::map(
            (0..n as u64).map(|i| (Encodable::unsigned(i), Encodable::null())),
        ))
    };
    assert_eq!(map(23)[..1], hex!("b7"));
    assert_eq!(map(24)[..2], hex!("b818"));
    assert_eq!(map(300)[..3], hex!("b9012c"));
}

#[test]
fn map_key_order() {
    // Insertion order "b" then "a"
    assert_eq!(
        *write(&Encodable::map([
            (Encodable::text("b"), Encodable::unsigned(1)),
            (Encodable::text("a"), Encodable::unsigned(2)),
        ])),
        hex!("a2 616102 616201")
    );

    // Shorter encodings sort first, as do strict prefixes
    assert_eq!(
        *write(&Encodable::map([
            (Encodable::text("aa"), Encodable::unsigned(1)),
            (Encodable::text("b"), Encodable::unsigned(2)),
            (Encodable::text("a"), Encodable::unsigned(3)),
        ])),
        hex!("a3 616103 616202 62616101")
    );

    // Ordering follows the key's whole encoding, so a long key sorts after
    // every key with a shorter length header
    let long: String = core::iter::repeat_n('a', 24).collect();
    let bytes = write(&Encodable::map([
        (Encodable::text(&long), Encodable::unsigned(1)),
        (Encodable::text("z"), Encodable::unsigned(2)),
    ]));
    assert_eq!(bytes[..4], hex!("a2 617a 02"));

    // Values are written in their own canonical form
    assert_eq!(
        *write(&Encodable::map([(
            Encodable::text("m"),
            Encodable::map([
                (Encodable::text("y"), Encodable::unsigned(1)),
                (Encodable::text("x"), Encodable::unsigned(2)),
            ])
        )])),
        hex!("a1 616d a2 617802 617901")
    );
}

#[test]
fn arrays_keep_order() {
    assert_eq!(
        *encode(&vec![String::from("b"), String::from("a")]).unwrap(),
        hex!("82 6162 6161")
    );
}

#[test]
fn deterministic() {
    let mut m = BTreeMap::new();
    for (i, k) in ["delta", "a", "charlie", "bb", "echo"].iter().enumerate() {
        m.insert(String::from(*k), i as u64);
    }
    let first = encode(&m).unwrap();
    let rev = Encodable::map(
        m.iter()
            .rev()
            .map(|(k, v)| (Encodable::text(k), Encodable::unsigned(*v))),
    );
    assert_eq!(write(&rev), first);
    assert_eq!(first[..3], hex!("a5 6161"));
}

#[test]
fn absent_keys_and_tag_payloads() {
    // An absent key drops its entry like an absent value does
    let bytes = write(&Encodable::map([
        (Encodable::Absent, Encodable::unsigned(1)),
        (Encodable::text("a"), Encodable::unsigned(2)),
    ]));
    assert_eq!(bytes, hex!("a1 616102"));
    assert!(crate::decode_value(&bytes).is_ok());

    let bytes = write(&Encodable::map([(Encodable::Absent, Encodable::unsigned(1))]));
    assert_eq!(bytes, hex!("a0"));
    assert!(crate::decode_value(&bytes).is_ok());

    // A tag always carries an item
    let bytes = write(&Encodable::tagged(1, Encodable::Absent));
    assert_eq!(bytes, hex!("c1f6"));
    assert!(crate::decode_value(&bytes).is_ok());

    let bytes = write(&Encodable::tagged(1, Encodable::tagged(2, Encodable::Absent)));
    assert_eq!(bytes, hex!("c1c2f6"));
    assert!(crate::decode_value(&bytes).is_ok());
}
