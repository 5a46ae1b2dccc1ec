//! Error types for dataset operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while serializing, storing or labeling datasets.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON file on disk could not be read or written.
    #[error("JSON error at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Record could not be encoded.
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    /// A JSONL line is not a valid record.
    #[error("invalid record on line {line}: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Filename would resolve outside the store directories.
    #[error("unsafe dataset filename: {0:?}")]
    UnsafeFilename(String),

    /// Dataset is not present in either store directory.
    #[error("dataset not found: {0}")]
    NotFound(String),
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
