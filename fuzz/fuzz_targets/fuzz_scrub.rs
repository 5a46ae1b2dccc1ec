//! Fuzz target for the scrubber.
//!
//! Rules may match across line breaks, but scrubbing must never change the
//! number of lines the segmenter sees.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let scrubbed = dc_redact::scrub(text);
        assert_eq!(scrubbed.matches('\n').count(), text.matches('\n').count());
    }
});
