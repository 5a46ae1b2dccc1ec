//! PDF page text.

use crate::Result;
use lopdf::Document;
use tracing::debug;

/// Extract text page by page, in page order.
///
/// Pages that yield no text (blank, image-only, or whose content stream the
/// text decoder cannot handle) are skipped. Surviving pages are joined with
/// `\n`. A payload that does not parse as a PDF is an error.
pub fn extract_pdf(bytes: &[u8]) -> Result<String> {
    let document = Document::load_mem(bytes)?;
    let pages = document.get_pages();

    let mut texts = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        match document.extract_text(&[*page_number]) {
            Ok(text) if !text.trim().is_empty() => texts.push(text.trim_end().to_string()),
            Ok(_) => debug!(page = page_number, "PDF page has no text"),
            Err(e) => debug!(page = page_number, error = %e, "PDF page text unreadable"),
        }
    }

    debug!(
        pages = pages.len(),
        with_text = texts.len(),
        "Extracted PDF text"
    );
    Ok(texts.join("\n"))
}
