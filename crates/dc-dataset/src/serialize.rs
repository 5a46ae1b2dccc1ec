//! JSONL rendering and dataset filenames.
//!
//! Content is one compact JSON object per record joined with `\n`, with no
//! trailing newline. Filenames are `{tag}_{YYYYMMDD_HHMMSS}.jsonl` in local
//! time at second resolution.

use crate::{DatasetError, Result};
use chrono::{Local, NaiveDateTime};
use dc_common::Record;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Extension of stored datasets.
pub const DATASET_EXTENSION: &str = "jsonl";

/// MIME type offered for downloads.
pub const DATASET_MIME: &str = "text/plain";

/// `strftime` format of the filename timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// How the tag is turned into a filename prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagPolicy {
    /// Spaces become underscores; nothing else changes.
    #[default]
    Compat,
    /// Also neutralizes path separators, `..`, control characters and
    /// characters that are invalid in Windows filenames.
    Strict,
}

impl TagPolicy {
    pub fn sanitize(&self, tag: &str) -> String {
        match self {
            TagPolicy::Compat => tag.replace(' ', "_"),
            TagPolicy::Strict => tag
                .replace("..", "_")
                .chars()
                .map(|c| match c {
                    ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                    c if c.is_control() => '_',
                    c => c,
                })
                .collect(),
        }
    }
}

/// Build the dataset filename for `tag` at `at`.
pub fn dataset_filename(tag: &str, policy: TagPolicy, at: NaiveDateTime) -> String {
    format!(
        "{}_{}.{}",
        policy.sanitize(tag),
        at.format(TIMESTAMP_FORMAT),
        DATASET_EXTENSION
    )
}

/// Render records as JSONL.
pub fn to_jsonl(records: &[Record]) -> Result<String> {
    let lines = records
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

/// Parse JSONL content back into records.
///
/// Blank lines (including a trailing newline) are skipped. Line numbers in
/// errors are 1-based.
pub fn parse_jsonl(content: &str) -> Result<Vec<Record>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| DatasetError::InvalidLine {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

/// A rendered dataset ready to store or hand to a downloader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetArtifact {
    pub filename: String,
    pub content: String,
    pub mime: &'static str,
}

impl DatasetArtifact {
    pub fn bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Renders records and names the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer {
    tag_policy: TagPolicy,
}

impl Serializer {
    pub fn new(tag_policy: TagPolicy) -> Self {
        Self { tag_policy }
    }

    pub fn tag_policy(&self) -> TagPolicy {
        self.tag_policy
    }

    /// Serialize using the current local time for the filename.
    pub fn serialize(&self, records: &[Record], tag: &str) -> Result<DatasetArtifact> {
        self.serialize_at(records, tag, Local::now().naive_local())
    }

    /// Serialize with an explicit filename timestamp.
    pub fn serialize_at(
        &self,
        records: &[Record],
        tag: &str,
        at: NaiveDateTime,
    ) -> Result<DatasetArtifact> {
        let content = to_jsonl(records)?;
        let filename = dataset_filename(tag, self.tag_policy, at);
        debug!(
            filename = %filename,
            records = records.len(),
            bytes = content.len(),
            "Serialized dataset"
        );
        Ok(DatasetArtifact {
            filename,
            content,
            mime: DATASET_MIME,
        })
    }
}

/// Serialize with the default tag policy; returns `(content, filename)`.
pub fn serialize(records: &[Record], tag: &str) -> Result<(String, String)> {
    let artifact = Serializer::default().serialize(records, tag)?;
    Ok((artifact.content, artifact.filename))
}
