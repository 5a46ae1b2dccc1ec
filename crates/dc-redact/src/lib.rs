//! Pattern-based PII scrubbing for dataset creation.
//!
//! This crate provides the scrubber that runs over every extracted document
//! before it is segmented into training records.
//!
//! # Key Features
//!
//! - **Ordered rules**: redaction is an ordered list of (pattern, token) rules.
//!   Earlier rules can mask text that later rules would match, so the
//!   built-in order is fixed: names, dates, phone numbers, emails.
//! - **Pluggable**: extra rules are appended after the built-ins, either in
//!   code or from a JSON [`ScrubPolicy`].
//! - **Line-preserving**: rules may match across a line break (a phone
//!   number wrapped by PDF layout), but every line break inside a match is
//!   re-emitted after the token, so the line count the segmenter relies on
//!   survives scrubbing.
//!
//! # Limitations
//!
//! This is a best-effort heuristic, not de-identification. The name rule
//! redacts any two capitalized words in a row ("New York", "Good Morning")
//! and misses names that do not have that shape ("alice", "Dr. Smith",
//! "Mary-Jane O'Neil"). Do not treat scrubbed output as anonymized.
//!
//! # Example
//!
//! ```
//! use dc_redact::Scrubber;
//!
//! let scrubber = Scrubber::new();
//! let out = scrubber.scrub("Alice Smith called on 01/02/2023");
//! assert_eq!(out, "[REDACTED_NAME] called on [REDACTED_DATE]");
//! ```

pub mod error;
pub mod policy;
pub mod rule;
pub mod scrubber;

pub use error::{RedactError, Result};
pub use policy::{RuleSpec, ScrubPolicy};
pub use rule::{BuiltinRule, ScrubRule, DATE_TOKEN, EMAIL_TOKEN, NAME_TOKEN, PHONE_TOKEN, SSN_TOKEN};
pub use scrubber::{scrub, RuleHit, ScrubReport, ScrubbedText, Scrubber};
