//! Error types for the scrubber.

use thiserror::Error;

/// Result type for scrubbing operations.
pub type Result<T> = std::result::Result<T, RedactError>;

/// Errors that can occur while building a scrubber.
///
/// Scrubbing itself is infallible; only rule construction and policy
/// loading can fail.
#[derive(Error, Debug)]
pub enum RedactError {
    /// A rule pattern failed to compile.
    #[error("pattern error in rule '{rule}': {message}")]
    PatternError { rule: String, message: String },

    /// The policy is structurally valid JSON but semantically wrong.
    #[error("policy error: {0}")]
    PolicyError(String),

    /// I/O error while reading a policy file.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RedactError {
    pub(crate) fn pattern(rule: &str, err: regex::Error) -> Self {
        RedactError::PatternError {
            rule: rule.to_string(),
            message: err.to_string(),
        }
    }
}
