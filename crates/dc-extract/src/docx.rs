//! Word (`.docx`) body text.
//!
//! A `.docx` file is a ZIP container; the body lives in `word/document.xml`.
//! Structure that matters here:
//!
//! ```text
//! w:body
//!   w:p            one paragraph, one output line
//!     w:r          run
//!       w:t        text (concatenated within the paragraph)
//!       w:tab      tab character
//!       w:br/w:cr  line break
//! ```
//!
//! Headers, footers, footnotes and images live in other parts and are not
//! read.

use crate::{ExtractError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// Path of the body part inside the container.
pub const BODY_PART: &str = "word/document.xml";

/// Extract body paragraphs from `.docx` bytes, one paragraph per line.
pub fn extract_docx(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut xml = String::new();
    {
        let mut part = archive
            .by_name(BODY_PART)
            .map_err(|_| ExtractError::MissingPart(BODY_PART.to_string()))?;
        part.read_to_string(&mut xml)?;
    }

    let paragraphs = body_paragraphs(&xml)?;
    debug!(paragraphs = paragraphs.len(), "Extracted docx body");
    Ok(paragraphs.join("\n"))
}

/// Walk the body XML collecting paragraph text.
pub fn body_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        let event = reader.read_event().map_err(|e| ExtractError::Xml {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(e) => {
                if e.name().as_ref() == b"w:t" {
                    in_text = true;
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(|e| ExtractError::Xml {
                    position: reader.buffer_position() as u64,
                    message: e.to_string(),
                })?;
                current.push_str(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs)
}
