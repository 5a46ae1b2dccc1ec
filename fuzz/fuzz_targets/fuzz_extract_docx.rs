//! Fuzz target for Word document extraction.
//!
//! Uploads are untrusted; extraction must return an error, never panic.

#![no_main]

use dc_common::{MediaType, RawDocument};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = dc_extract::extract(&RawDocument::new(data.to_vec(), MediaType::Docx));
    if let Ok(xml) = std::str::from_utf8(data) {
        let _ = dc_extract::docx::body_paragraphs(xml);
    }
});
