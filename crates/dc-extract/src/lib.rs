//! Plain-text extraction for uploaded documents.
//!
//! Converts a [`RawDocument`] of a known media type into plain text:
//!
//! - `text/plain`: the payload decoded as UTF-8, verbatim
//! - `application/pdf`: text of each page in page order, pages without text
//!   skipped, joined with `\n`
//! - Word (`.docx`): body paragraphs from `word/document.xml`, one per line
//!
//! Unrecognized media types yield an empty string rather than an error, so a
//! heterogeneous batch never aborts on an unexpected upload. Malformed
//! payloads of a supported type are reported as [`ExtractError`] and it is up
//! to the caller whether to skip the file or abort.
//!
//! # Example
//!
//! ```
//! use dc_common::RawDocument;
//! use dc_extract::extract;
//!
//! let text = extract(&RawDocument::text("line one\nline two")).unwrap();
//! assert_eq!(text, "line one\nline two");
//!
//! let unknown = RawDocument::new(vec![0xff, 0xd8], "image/jpeg");
//! assert_eq!(extract(&unknown).unwrap(), "");
//! ```

pub mod docx;
pub mod error;
pub mod extractor;
pub mod pdf;

pub use dc_common::{MediaType, RawDocument};
pub use error::{ExtractError, Result};
pub use extractor::{extract, Extractor};
