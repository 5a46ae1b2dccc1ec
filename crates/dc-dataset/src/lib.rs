//! Dataset assembly and versioned storage.
//!
//! Takes scrubbed text the rest of the way to disk:
//!
//! - [`segment`]: pair non-blank paragraphs into prompt/response records
//! - [`serialize`]: render records as JSONL and name the file
//! - [`store`]: write the primary copy and its mirror in the version directory
//! - [`labels`]: attach human labels to stored filenames
//!
//! # Example
//!
//! ```no_run
//! use dc_dataset::{segment, LabelStore, Serializer, StoreLayout, VersionStore};
//!
//! let records = segment("How was today?\nLong, but okay.", "check-in");
//! let artifact = Serializer::default().serialize(&records, "check-in").unwrap();
//!
//! let layout = StoreLayout::new("/var/lib/dataset_creator");
//! let receipt = VersionStore::new(layout.clone())
//!     .store(&artifact.content, &artifact.filename)
//!     .unwrap();
//! LabelStore::new(layout.labels_path())
//!     .label_version(&receipt.filename, "baseline")
//!     .unwrap();
//! ```

pub mod error;
pub mod labels;
pub mod segment;
pub mod serialize;
pub mod store;

pub use dc_common::{Dataset, Record};
pub use error::{DatasetError, Result};
pub use labels::{LabelStore, VersionLabelMap};
pub use segment::{paragraphs, segment, OddParagraphPolicy, Segmentation, Segmenter};
pub use serialize::{
    dataset_filename, parse_jsonl, serialize, to_jsonl, DatasetArtifact, Serializer, TagPolicy,
    DATASET_EXTENSION, DATASET_MIME, TIMESTAMP_FORMAT,
};
pub use store::{
    compute_checksum, validate_filename, CollisionPolicy, StoreLayout, StoreReceipt,
    VersionStore, BACKUP_DIR, LABELS_FILE, STORAGE_DIR, VERSION_DIR,
};
