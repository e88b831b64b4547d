#![cfg(test)]

use std::io::Read;

#[path = "scan_all.rs"]
mod scan_all;

#[test]
fn test_all() {
    match std::fs::read_dir("./corpus/decode") {
        Err(e) => {
            eprintln!(
                "Failed to open dir: {e}, curr dir: {}",
                std::env::current_dir().unwrap().to_string_lossy()
            );
        }
        Ok(dir) => {
            for entry in dir.flatten() {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                if let Ok(mut file) = std::fs::File::open(&path) {
                    let mut buffer = Vec::new();
                    if file.read_to_end(&mut buffer).is_ok() {
                        _ = scan_all::scan_all(&buffer);
                        _ = dag_cbor::decode_value(&buffer);
                    }
                }
            }
        }
    }
}

#[test]
fn test_every_item_validated() {
    // A lone half-precision float
    let results = scan_all::scan_all(&[0xf9, 0x3c, 0x00]);
    assert_eq!(results.len(), 1);
    assert!(matches!(
        results[0],
        Err(dag_cbor::Error::Invalid {
            source: dag_cbor::validate::Error::Float,
            ..
        })
    ));

    // 1, then 1.0, then an unassigned major-7 item
    let results = scan_all::scan_all(&[0x01, 0xf9, 0x3c, 0x00, 0xfc]);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_err());

    // Empty input scans as a single absent item
    assert_eq!(scan_all::scan_all(&[]).len(), 1);

    // Malformed input stops the scan
    assert_eq!(scan_all::scan_all(&[0x01, 0x18]).len(), 1);
}
