//! Error types for document extraction.

use thiserror::Error;

/// Errors that can occur while extracting text from a document.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Plain-text payload is not valid UTF-8.
    #[error("text payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// PDF payload could not be parsed.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Word container could not be opened.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Word body part missing.
    #[error("missing part in Word document: {0}")]
    MissingPart(String),

    /// Word body XML is malformed.
    #[error("malformed Word XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// I/O error while reading from the container.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for extraction.
pub type Result<T> = std::result::Result<T, ExtractError>;
