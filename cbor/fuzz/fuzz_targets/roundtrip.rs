#![no_main]

use dag_cbor::ToCbor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = dag_cbor::decode_value(data) {
        let canonical = dag_cbor::encode(&value).expect("Valid tree failed to encode");
        let again = dag_cbor::decode_value(&canonical).expect("Canonical output failed to decode");
        assert_eq!(
            dag_cbor::encode_value(&again.to_cbor().expect("Valid tree failed to encode")),
            canonical
        );
    }
});
