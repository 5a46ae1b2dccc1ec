//! Prompt/response training records.

use serde::{Deserialize, Serialize};

/// One training example.
///
/// Produced by the segmenter from two consecutive non-blank paragraphs, so
/// both `prompt` and `response` are non-empty and already trimmed. Field
/// order here is the field order on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The first paragraph of the pair.
    pub prompt: String,
    /// The paragraph that follows the prompt.
    pub response: String,
    /// Caller-supplied tag shared by every record of one run.
    pub tag: String,
}

impl Record {
    /// Create a new record.
    pub fn new(
        prompt: impl Into<String>,
        response: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            response: response.into(),
            tag: tag.into(),
        }
    }
}

/// Ordered sequence of records, serialized one JSON object per line.
pub type Dataset = Vec<Record>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_on_wire() {
        let record = Record::new("How are you?", "Fine.", "grief");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"prompt":"How are you?","response":"Fine.","tag":"grief"}"#
        );
    }
}
