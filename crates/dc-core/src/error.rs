//! Top-level error type for the pipeline and CLI.

use crate::config::ConfigError;
use crate::exit_codes::ExitCode;
use dc_dataset::DatasetError;
use dc_redact::RedactError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by `dc-core`.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("scrub policy: {0}")]
    Redact(#[from] RedactError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    /// Exit code the CLI reports for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CoreError::Config(_) | CoreError::Redact(_) => ExitCode::ConfigError,
            CoreError::Io { .. } => ExitCode::IoError,
            CoreError::InvalidInput(_) => ExitCode::ArgsError,
            CoreError::Dataset(e) => match e {
                DatasetError::Io { .. } | DatasetError::Json { .. } => ExitCode::IoError,
                DatasetError::UnsafeFilename(_) | DatasetError::NotFound(_) => ExitCode::ArgsError,
                DatasetError::Encode(_) | DatasetError::InvalidLine { .. } => {
                    ExitCode::InternalError
                }
            },
        }
    }
}

/// Result type alias for `dc-core`.
pub type Result<T> = std::result::Result<T, CoreError>;
