//! Fuzz target for config.json parsing and validation.

#![no_main]

use dc_core::config::Config;
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = std::str::from_utf8(data) {
        let _ = Config::from_json(json, Path::new("fuzz.json"));
    }
});
