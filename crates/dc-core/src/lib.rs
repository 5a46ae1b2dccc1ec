//! Dataset creator core.
//!
//! Wires extraction, scrubbing, segmentation, serialization and versioned
//! storage into one [`pipeline::Pipeline`], plus the ambient pieces the `dc`
//! binary needs: configuration resolution, logging and exit codes.

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod pipeline;

pub use error::{CoreError, Result};
pub use exit_codes::ExitCode;
pub use pipeline::{FileWarning, Pipeline, PipelineOutcome, DEFAULT_TAG};
