//! Media-type dispatch.

use crate::docx::extract_docx;
use crate::pdf::extract_pdf;
use crate::Result;
use dc_common::{MediaType, RawDocument};
use tracing::debug;

/// Converts raw uploads into plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor;

impl Extractor {
    /// Create an extractor.
    pub fn new() -> Self {
        Extractor
    }

    /// Extract plain text from a document.
    ///
    /// Returns `Ok("")` for media types this extractor does not know. Empty
    /// and zero-page documents also produce `""`.
    pub fn extract(&self, raw: &RawDocument) -> Result<String> {
        let text = match &raw.media_type {
            MediaType::PlainText => String::from_utf8(raw.bytes.clone())?,
            MediaType::Pdf => extract_pdf(&raw.bytes)?,
            MediaType::Docx => extract_docx(&raw.bytes)?,
            MediaType::Unknown(mime) => {
                debug!(
                    name = raw.display_name(),
                    media_type = %mime,
                    "Unrecognized media type; contributing no text"
                );
                return Ok(String::new());
            }
        };

        debug!(
            name = raw.display_name(),
            media_type = %raw.media_type,
            bytes = raw.len(),
            chars = text.chars().count(),
            "Extracted document text"
        );
        Ok(text)
    }
}

/// Extract with a default [`Extractor`].
pub fn extract(raw: &RawDocument) -> Result<String> {
    Extractor::new().extract(raw)
}
