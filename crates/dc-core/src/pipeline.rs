//! End-to-end dataset creation.
//!
//! One run: extract each input, scrub it, concatenate in input order (each
//! text followed by `\n`, after any paragraph carried over from a previous
//! run), segment, serialize, store both copies, and optionally label the
//! result. An input that fails extraction is skipped with a [`FileWarning`];
//! the rest of the batch still produces a dataset. A label that cannot be
//! recorded is reported in [`PipelineOutcome::label_warning`] since the
//! dataset is already on disk by then.

use crate::config::Config;
use crate::{CoreError, Result};
use chrono::{Local, NaiveDateTime};
use dc_common::{RawDocument, Record};
use dc_dataset::{
    DatasetArtifact, LabelStore, Segmenter, Serializer, StoreReceipt, VersionLabelMap,
    VersionStore,
};
use dc_extract::Extractor;
use dc_redact::{ScrubReport, Scrubber};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

/// Tag used when the caller does not supply one.
pub const DEFAULT_TAG: &str = "mental_health";

/// An input that contributed nothing because extraction failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileWarning {
    pub file: String,
    pub error: String,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub tag: String,
    pub records: Vec<Record>,
    /// Unpaired trailing paragraph under `carry_prompt`. Pass it back as
    /// `carry` on the next run to pair it with the next batch.
    pub leftover: Option<String>,
    pub artifact: DatasetArtifact,
    pub receipt: StoreReceipt,
    pub label: Option<String>,
    /// Why the requested label was not recorded.
    pub label_warning: Option<String>,
    pub warnings: Vec<FileWarning>,
    pub scrub: ScrubReport,
    pub files_processed: usize,
    #[serde(skip)]
    preview_len: usize,
}

impl PipelineOutcome {
    /// First records of the dataset, as shown to the user.
    pub fn preview(&self) -> &[Record] {
        &self.records[..self.records.len().min(self.preview_len)]
    }

    pub fn filename(&self) -> &str {
        &self.receipt.filename
    }

    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty() || self.label_warning.is_some()
    }
}

/// Configured pipeline stages.
#[derive(Debug)]
pub struct Pipeline {
    extractor: Extractor,
    scrubber: Scrubber,
    segmenter: Segmenter,
    serializer: Serializer,
    store: VersionStore,
    labels: LabelStore,
    preview_len: usize,
}

impl Pipeline {
    /// Build every stage from a validated config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let layout = config.layout();
        Ok(Self {
            extractor: Extractor::new(),
            scrubber: Scrubber::from_policy(&config.scrub)?,
            segmenter: Segmenter::new(config.odd_paragraph),
            serializer: Serializer::new(config.tag_policy),
            labels: LabelStore::new(layout.labels_path()),
            store: VersionStore::new(layout).with_collision(config.collision),
            preview_len: config.preview_len,
        })
    }

    pub fn store(&self) -> &VersionStore {
        &self.store
    }

    pub fn labels(&self) -> &LabelStore {
        &self.labels
    }

    pub fn preview_len(&self) -> usize {
        self.preview_len
    }

    /// Run the pipeline, naming the output with the current local time.
    ///
    /// `carry` is a paragraph left over from a previous run; it is placed
    /// before the first input.
    pub fn run(
        &self,
        inputs: &[RawDocument],
        tag: &str,
        label: Option<&str>,
        carry: Option<&str>,
    ) -> Result<PipelineOutcome> {
        self.run_at(inputs, tag, label, carry, Local::now().naive_local())
    }

    /// Run the pipeline with an explicit filename timestamp.
    pub fn run_at(
        &self,
        inputs: &[RawDocument],
        tag: &str,
        label: Option<&str>,
        carry: Option<&str>,
        at: NaiveDateTime,
    ) -> Result<PipelineOutcome> {
        if inputs.is_empty() {
            return Err(CoreError::InvalidInput("no input documents".to_string()));
        }

        let span = info_span!("create", tag, files = inputs.len());
        let _enter = span.enter();

        self.store.provision()?;

        let mut combined = String::new();
        let mut warnings = Vec::new();
        let mut scrub = ScrubReport::default();

        if let Some(carry) = carry.filter(|c| !c.trim().is_empty()) {
            let scrubbed = self.scrubber.scrub_with_report(carry);
            debug!(chars = carry.chars().count(), "Prepending carried paragraph");
            scrub.merge(&scrubbed.report);
            combined.push_str(&scrubbed.text);
            combined.push('\n');
        }

        for raw in inputs {
            let text = match self.extractor.extract(raw) {
                Ok(text) => text,
                Err(e) => {
                    warn!(file = raw.display_name(), error = %e, "Skipping unreadable document");
                    warnings.push(FileWarning {
                        file: raw.display_name().to_string(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            let scrubbed = self.scrubber.scrub_with_report(&text);
            debug!(
                file = raw.display_name(),
                chars = text.chars().count(),
                redactions = scrubbed.report.total(),
                "Scrubbed document"
            );
            scrub.merge(&scrubbed.report);
            combined.push_str(&scrubbed.text);
            combined.push('\n');
        }

        let segmentation = self.segmenter.segment(&combined, tag);
        let artifact = self
            .serializer
            .serialize_at(&segmentation.records, tag, at)?;
        let receipt = self.store.store(&artifact.content, &artifact.filename)?;

        let mut label_warning = None;
        let label = match label.filter(|l| !l.is_empty()) {
            Some(label) => match self.labels.label_version(&receipt.filename, label) {
                Ok(_) => Some(label.to_string()),
                Err(e) => {
                    warn!(filename = %receipt.filename, error = %e, "Dataset stored but label not recorded");
                    label_warning = Some(e.to_string());
                    None
                }
            },
            None => None,
        };

        info!(
            filename = %receipt.filename,
            records = segmentation.records.len(),
            skipped = warnings.len(),
            redactions = scrub.total(),
            "Dataset created"
        );

        Ok(PipelineOutcome {
            tag: tag.to_string(),
            records: segmentation.records,
            leftover: segmentation.leftover,
            artifact,
            receipt,
            label,
            label_warning,
            warnings,
            scrub,
            files_processed: inputs.len(),
            preview_len: self.preview_len,
        })
    }

    /// Attach a label to an already stored dataset.
    pub fn label(&self, filename: &str, label: &str) -> Result<VersionLabelMap> {
        Ok(self.labels.label_version(filename, label)?)
    }

    /// Read back the first `limit` records of a stored dataset.
    pub fn preview(&self, filename: &str, limit: usize) -> Result<Vec<Record>> {
        let content = self.store.read(filename)?;
        let mut records = dc_dataset::parse_jsonl(&content)?;
        records.truncate(limit);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dc_common::MediaType;
    use tempfile::TempDir;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn pipeline(dir: &TempDir) -> Pipeline {
        let config = Config {
            root: dir.path().to_path_buf(),
            ..Config::default()
        };
        Pipeline::from_config(&config).unwrap()
    }

    #[test]
    fn test_scrubbed_records_stored() {
        let dir = TempDir::new().unwrap();
        let input = RawDocument::text(
            "Alice Smith called on 01/02/2023\nReach me at a@b.com\nMy number is 555-123-4567\nThanks",
        );
        let outcome = pipeline(&dir).run_at(&[input], "intake", None, None, at()).unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(
            outcome.records[0],
            Record::new(
                "[REDACTED_NAME] called on [REDACTED_DATE]",
                "Reach me at [REDACTED_EMAIL]",
                "intake"
            )
        );
        assert_eq!(outcome.scrub.total(), 4);
        assert_eq!(outcome.filename(), "intake_20250115_100000.jsonl");
        assert!(!outcome.is_partial());
    }

    #[test]
    fn test_files_concatenate_in_order() {
        let dir = TempDir::new().unwrap();
        let inputs = [RawDocument::text("Q1"), RawDocument::text("A1\nQ2"), RawDocument::text("A2")];
        let outcome = pipeline(&dir).run_at(&inputs, "t", None, None, at()).unwrap();
        assert_eq!(
            outcome.records,
            vec![Record::new("Q1", "A1", "t"), Record::new("Q2", "A2", "t")]
        );
    }

    #[test]
    fn test_malformed_file_skipped_with_warning() {
        let dir = TempDir::new().unwrap();
        let inputs = [
            RawDocument::new(b"not a pdf".to_vec(), MediaType::Pdf).with_name("broken.pdf"),
            RawDocument::text("Q\nA").with_name("ok.txt"),
        ];
        let outcome = pipeline(&dir).run_at(&inputs, "t", None, None, at()).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].file, "broken.pdf");
        assert!(outcome.is_partial());
        assert!(outcome.receipt.primary_path.exists());
    }

    #[test]
    fn test_unknown_media_type_contributes_nothing() {
        let dir = TempDir::new().unwrap();
        let inputs = [RawDocument::new(b"Q\nA".to_vec(), "text/markdown")];
        let outcome = pipeline(&dir).run_at(&inputs, "t", None, None, at()).unwrap();
        assert!(outcome.records.is_empty());
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.artifact.content, "");
    }

    #[test]
    fn test_preview_limited() {
        let dir = TempDir::new().unwrap();
        let text = (0..10).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let outcome = pipeline(&dir)
            .run_at(&[RawDocument::text(text)], "t", None, None, at())
            .unwrap();
        assert_eq!(outcome.records.len(), 5);
        assert_eq!(outcome.preview().len(), 3);
        assert_eq!(outcome.preview()[0].prompt, "line 0");
    }

    #[test]
    fn test_label_recorded_and_empty_label_ignored() {
        let dir = TempDir::new().unwrap();
        let p = pipeline(&dir);
        let labeled = p
            .run_at(&[RawDocument::text("a\nb")], "one", Some("baseline"), None, at())
            .unwrap();
        p.run_at(&[RawDocument::text("c\nd")], "two", Some(""), None, at())
            .unwrap();

        let map = p.labels().load().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map[labeled.filename()], "baseline");
    }

    #[test]
    fn test_no_inputs_rejected() {
        let dir = TempDir::new().unwrap();
        let err = pipeline(&dir).run_at(&[], "t", None, None, at()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_label_failure_keeps_stored_dataset() {
        let dir = TempDir::new().unwrap();
        let p = pipeline(&dir);
        std::fs::write(p.labels().path(), "{not json").unwrap();

        let outcome = p
            .run_at(&[RawDocument::text("a\nb")], "t", Some("v1"), None, at())
            .unwrap();
        assert!(outcome.receipt.primary_path.exists());
        assert_eq!(outcome.label, None);
        assert!(outcome.label_warning.is_some());
        assert!(outcome.is_partial());
    }

    #[test]
    fn test_carried_paragraph_pairs_with_first_input() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            root: dir.path().to_path_buf(),
            odd_paragraph: dc_dataset::OddParagraphPolicy::CarryPrompt,
            ..Config::default()
        };
        let p = Pipeline::from_config(&config).unwrap();

        let first = p
            .run_at(&[RawDocument::text("Q1\nA1\nQ2")], "t", None, None, at())
            .unwrap();
        assert_eq!(first.leftover.as_deref(), Some("Q2"));

        let second = p
            .run_at(
                &[RawDocument::text("A2")],
                "t2",
                None,
                first.leftover.as_deref(),
                at(),
            )
            .unwrap();
        assert_eq!(second.records, vec![Record::new("Q2", "A2", "t2")]);
        assert_eq!(second.leftover, None);
    }

    #[test]
    fn test_preview_reads_stored_dataset() {
        let dir = TempDir::new().unwrap();
        let p = pipeline(&dir);
        let outcome = p
            .run_at(&[RawDocument::text("a\nb\nc\nd")], "t", None, None, at())
            .unwrap();
        let records = p.preview(outcome.filename(), 1).unwrap();
        assert_eq!(records, vec![Record::new("a", "b", "t")]);
    }
}
