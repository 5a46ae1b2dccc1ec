//! Fuzz target for PDF extraction.

#![no_main]

use dc_common::{MediaType, RawDocument};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = dc_extract::extract(&RawDocument::new(data.to_vec(), MediaType::Pdf));
});
