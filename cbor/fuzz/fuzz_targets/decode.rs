#![no_main]

use libfuzzer_sys::fuzz_target;

#[path = "../scan_all.rs"]
mod scan_all;

fuzz_target!(|data: &[u8]| {
    _ = scan_all::scan_all(data);
});
