//! Raw uploaded documents.

use crate::MediaType;
use std::fmt;
use std::path::Path;

/// A byte blob as received from the upload surface, plus its declared type.
///
/// Ephemeral: created per upload and consumed by extraction.
#[derive(Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Raw payload bytes.
    pub bytes: Vec<u8>,
    /// Media type declared by the uploader.
    pub media_type: MediaType,
    /// Display name (usually the uploaded file name), used in warnings.
    pub name: Option<String>,
}

impl RawDocument {
    /// Create a document from bytes and a declared media type.
    pub fn new(bytes: impl Into<Vec<u8>>, media_type: impl Into<MediaType>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
            name: None,
        }
    }

    /// Create a plain-text document from a string.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(content.into().into_bytes(), MediaType::PlainText)
    }

    /// Read a document from disk, inferring its media type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        Ok(Self {
            bytes,
            media_type: MediaType::from_path(path),
            name,
        })
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the declared media type.
    pub fn with_media_type(mut self, media_type: impl Into<MediaType>) -> Self {
        self.media_type = media_type.into();
        self
    }

    /// Name for logs and warnings; falls back to `<unnamed>`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Payloads can be large and may hold unredacted text, so Debug prints only
// the metadata.
impl fmt::Debug for RawDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawDocument")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
