//! Redaction rules.
//!
//! A rule is a compiled pattern plus the literal token that replaces every
//! match. The four default rules are pre-compiled once per process.

use crate::{RedactError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Replacement token for two-capitalized-word names.
pub const NAME_TOKEN: &str = "[REDACTED_NAME]";
/// Replacement token for slash-separated dates.
pub const DATE_TOKEN: &str = "[REDACTED_DATE]";
/// Replacement token for US-style phone numbers.
pub const PHONE_TOKEN: &str = "[REDACTED_PHONE]";
/// Replacement token for email-like strings.
pub const EMAIL_TOKEN: &str = "[REDACTED_EMAIL]";
/// Replacement token for US social security numbers.
pub const SSN_TOKEN: &str = "[REDACTED_SSN]";

// Separators may be line breaks (wrapped PDF or docx text); `apply` puts
// them back after the token.
const NAME_PATTERN: &str = r"\b[A-Z][a-z]+\s[A-Z][a-z]+\b";
const DATE_PATTERN: &str = r"\d{1,2}/\d{1,2}/\d{2,4}";
const PHONE_PATTERN: &str = r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}";
const EMAIL_PATTERN: &str = r"[\w.-]+@[\w.-]+";
const SSN_PATTERN: &str = r"\b\d{3}-\d{2}-\d{4}\b";

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(NAME_PATTERN).unwrap());
static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(DATE_PATTERN).unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(PHONE_PATTERN).unwrap());
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(EMAIL_PATTERN).unwrap());
static SSN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(SSN_PATTERN).unwrap());

/// Rules shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinRule {
    /// Word starting uppercase then lowercase letters, one whitespace
    /// character, then another such word.
    Name,
    /// `d{1,2}/d{1,2}/d{2,4}`.
    Date,
    /// Optional parenthesized area code, 3 digits, 4 digits.
    Phone,
    /// Word characters, dots or dashes around an `@`.
    Email,
    /// `ddd-dd-dddd`. Opt-in.
    Ssn,
}

impl BuiltinRule {
    /// The default rules in their canonical order.
    ///
    /// Do not permute: the name rule must see the text before dates and
    /// digits are replaced, and the phone rule must run before the email
    /// rule so numeric local parts are not half-consumed.
    pub const DEFAULT_ORDER: [BuiltinRule; 4] = [
        BuiltinRule::Name,
        BuiltinRule::Date,
        BuiltinRule::Phone,
        BuiltinRule::Email,
    ];

    /// Stable rule name used in reports and policies.
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinRule::Name => "name",
            BuiltinRule::Date => "date",
            BuiltinRule::Phone => "phone",
            BuiltinRule::Email => "email",
            BuiltinRule::Ssn => "ssn",
        }
    }

    /// Replacement token.
    pub fn token(&self) -> &'static str {
        match self {
            BuiltinRule::Name => NAME_TOKEN,
            BuiltinRule::Date => DATE_TOKEN,
            BuiltinRule::Phone => PHONE_TOKEN,
            BuiltinRule::Email => EMAIL_TOKEN,
            BuiltinRule::Ssn => SSN_TOKEN,
        }
    }

    fn regex(&self) -> &'static Regex {
        match self {
            BuiltinRule::Name => &NAME_RE,
            BuiltinRule::Date => &DATE_RE,
            BuiltinRule::Phone => &PHONE_RE,
            BuiltinRule::Email => &EMAIL_RE,
            BuiltinRule::Ssn => &SSN_RE,
        }
    }

    /// Build a rule instance. `Regex` clones share the compiled program.
    pub fn rule(&self) -> ScrubRule {
        ScrubRule {
            name: self.name().to_string(),
            regex: self.regex().clone(),
            token: self.token().to_string(),
        }
    }

    /// Parse a rule name.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "name" => Some(BuiltinRule::Name),
            "date" => Some(BuiltinRule::Date),
            "phone" => Some(BuiltinRule::Phone),
            "email" => Some(BuiltinRule::Email),
            "ssn" => Some(BuiltinRule::Ssn),
            _ => None,
        }
    }
}

impl fmt::Display for BuiltinRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A compiled (pattern, replacement token) pair.
#[derive(Debug, Clone)]
pub struct ScrubRule {
    name: String,
    regex: Regex,
    token: String,
}

impl ScrubRule {
    /// Compile a custom rule.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        token: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let regex = Regex::new(pattern).map_err(|e| RedactError::pattern(&name, e))?;
        Ok(Self {
            name,
            regex,
            token: token.into(),
        })
    }

    /// Rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source pattern.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Replacement token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Whether the rule matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Replace all non-overlapping matches, left to right.
    ///
    /// Returns the rewritten text and the number of replacements. The token
    /// is inserted literally (no `$group` expansion), followed by any `\r` or
    /// `\n` the match spanned, so the line count never changes.
    pub fn apply<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let mut hits = 0usize;
        let out = self.regex.replace_all(text, |caps: &Captures<'_>| {
            hits += 1;
            let mut replacement = self.token.clone();
            replacement.extend(caps[0].chars().filter(|c| matches!(c, '\r' | '\n')));
            replacement
        });
        (out, hits)
    }
}
