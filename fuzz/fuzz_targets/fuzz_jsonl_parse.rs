//! Fuzz target for reading stored datasets back.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let _ = dc_dataset::parse_jsonl(content);
    }
});
