//! Dataset creator common types.
//!
//! This crate provides the foundational types shared across the pipeline:
//! - Media types declared by the upload surface
//! - Raw documents (bytes plus declared media type)
//! - Prompt/response records and the dataset they form
//! - Output format specifications for the CLI host

pub mod document;
pub mod media;
pub mod output;
pub mod record;

pub use document::RawDocument;
pub use media::MediaType;
pub use output::OutputFormat;
pub use record::{Dataset, Record};
