/// Scans `data` item by item until it is exhausted or malformed, validating every item scanned.
pub fn scan_all(data: &[u8]) -> Vec<Result<(), dag_cbor::Error>> {
    let mut results = Vec::new();
    let mut scanner = dag_cbor::decode::Scanner::new(data);
    while let Ok(value) = scanner.scan() {
        results.push(dag_cbor::validate::validate(&value));
        if scanner.is_empty() {
            break;
        }
    }
    results
}
