//! Paragraph pairing.
//!
//! Text is split on `\n`, each piece trimmed, blank pieces discarded. The
//! remaining paragraphs are paired (0,1), (2,3), ... into records. Scrubbing
//! keeps every line break, so the line count seen here is the one the
//! extractor produced.

use dc_common::Record;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What to do with the final paragraph when the count is odd.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddParagraphPolicy {
    /// Discard it.
    #[default]
    Drop,
    /// Hand it back as [`Segmentation::leftover`].
    CarryPrompt,
}

/// Output of one segmentation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub records: Vec<Record>,
    /// Unpaired trailing paragraph, only under [`OddParagraphPolicy::CarryPrompt`].
    pub leftover: Option<String>,
}

/// Split text into trimmed, non-blank paragraphs.
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Pairs paragraphs into records.
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    policy: OddParagraphPolicy,
}

impl Segmenter {
    pub fn new(policy: OddParagraphPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> OddParagraphPolicy {
        self.policy
    }

    /// Segment `text`, tagging every record with `tag`.
    pub fn segment(&self, text: &str, tag: &str) -> Segmentation {
        let paragraphs = paragraphs(text);
        let mut pairs = paragraphs.chunks_exact(2);

        let records: Vec<Record> = pairs
            .by_ref()
            .map(|pair| Record::new(pair[0], pair[1], tag))
            .collect();

        let leftover = match (pairs.remainder().first(), self.policy) {
            (Some(last), OddParagraphPolicy::CarryPrompt) => Some((*last).to_string()),
            (Some(last), OddParagraphPolicy::Drop) => {
                debug!(chars = last.chars().count(), "Dropped unpaired trailing paragraph");
                None
            }
            (None, _) => None,
        };

        debug!(
            paragraphs = paragraphs.len(),
            records = records.len(),
            leftover = leftover.is_some(),
            "Segmented text"
        );
        Segmentation { records, leftover }
    }
}

/// Segment with the default policy (unpaired trailing paragraph dropped).
pub fn segment(text: &str, tag: &str) -> Vec<Record> {
    Segmenter::default().segment(text, tag).records
}
