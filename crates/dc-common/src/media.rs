//! Declared media types for uploaded documents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// MIME type for plain text uploads.
pub const MIME_TEXT: &str = "text/plain";

/// MIME type for PDF uploads.
pub const MIME_PDF: &str = "application/pdf";

/// MIME type for Word (OOXML) uploads.
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Media type hint supplied alongside an uploaded byte blob.
///
/// Anything that is not one of the three supported types is kept verbatim
/// in [`MediaType::Unknown`] so it can be reported, but extraction treats it
/// as contributing no text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum MediaType {
    PlainText,
    Pdf,
    Docx,
    Unknown(String),
}

impl MediaType {
    /// Parse a MIME string.
    ///
    /// Matching is case-insensitive and ignores MIME parameters, so
    /// `text/plain; charset=utf-8` is plain text.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            MIME_TEXT => MediaType::PlainText,
            MIME_PDF => MediaType::Pdf,
            MIME_DOCX => MediaType::Docx,
            _ => MediaType::Unknown(mime.trim().to_string()),
        }
    }

    /// Infer the media type from a file extension, the way an upload widget
    /// restricted to `.txt`, `.pdf` and `.docx` would.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("txt") => MediaType::PlainText,
            Some("pdf") => MediaType::Pdf,
            Some("docx") => MediaType::Docx,
            Some(other) => MediaType::Unknown(format!("application/x-{}", other)),
            None => MediaType::Unknown("application/octet-stream".to_string()),
        }
    }

    /// The canonical MIME string for this media type.
    pub fn mime(&self) -> &str {
        match self {
            MediaType::PlainText => MIME_TEXT,
            MediaType::Pdf => MIME_PDF,
            MediaType::Docx => MIME_DOCX,
            MediaType::Unknown(raw) => raw,
        }
    }

    /// Whether the extractor knows how to read this media type.
    pub fn is_supported(&self) -> bool {
        !matches!(self, MediaType::Unknown(_))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mime())
    }
}

impl From<String> for MediaType {
    fn from(value: String) -> Self {
        MediaType::from_mime(&value)
    }
}

impl From<&str> for MediaType {
    fn from(value: &str) -> Self {
        MediaType::from_mime(value)
    }
}

impl From<MediaType> for String {
    fn from(value: MediaType) -> Self {
        value.mime().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime_known() {
        assert_eq!(MediaType::from_mime("text/plain"), MediaType::PlainText);
        assert_eq!(MediaType::from_mime("application/pdf"), MediaType::Pdf);
        assert_eq!(MediaType::from_mime(MIME_DOCX), MediaType::Docx);
    }

    #[test]
    fn test_from_mime_ignores_case_and_params() {
        assert_eq!(
            MediaType::from_mime("Text/Plain; charset=utf-8"),
            MediaType::PlainText
        );
        assert_eq!(MediaType::from_mime(" APPLICATION/PDF "), MediaType::Pdf);
    }

    #[test]
    fn test_from_mime_unknown_keeps_raw() {
        let media = MediaType::from_mime("image/png");
        assert_eq!(media, MediaType::Unknown("image/png".to_string()));
        assert!(!media.is_supported());
        assert_eq!(media.mime(), "image/png");
    }

    #[test]
    fn test_from_path() {
        assert_eq!(MediaType::from_path(Path::new("a/notes.TXT")), MediaType::PlainText);
        assert_eq!(MediaType::from_path(Path::new("session.pdf")), MediaType::Pdf);
        assert_eq!(MediaType::from_path(Path::new("intake.docx")), MediaType::Docx);
        assert!(!MediaType::from_path(Path::new("scan.png")).is_supported());
        assert!(!MediaType::from_path(Path::new("README")).is_supported());
    }

    #[test]
    fn test_serde_as_mime_string() {
        let json = serde_json::to_string(&MediaType::Pdf).unwrap();
        assert_eq!(json, "\"application/pdf\"");
        let back: MediaType = serde_json::from_str("\"text/plain\"").unwrap();
        assert_eq!(back, MediaType::PlainText);
    }
}
