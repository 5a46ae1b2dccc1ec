//! Versioned dataset storage.
//!
//! Every stored dataset is written to the primary directory and mirrored
//! byte-for-byte into the version directory:
//!
//! ```text
//! <root>/
//!   saved_datasets/<tag>_<timestamp>.jsonl
//!   versioned_datasets/<tag>_<timestamp>.jsonl
//!   backup_datasets/          created, never written
//!   version_labels.json       see crate::labels
//! ```

use crate::{DatasetError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const STORAGE_DIR: &str = "saved_datasets";
pub const VERSION_DIR: &str = "versioned_datasets";
pub const BACKUP_DIR: &str = "backup_datasets";
pub const LABELS_FILE: &str = "version_labels.json";

/// Directory names under a store root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreLayout {
    pub root: PathBuf,
    pub storage_dir: String,
    pub version_dir: String,
    pub backup_dir: String,
    pub labels_file: String,
}

impl StoreLayout {
    /// Default directory names under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            storage_dir: STORAGE_DIR.to_string(),
            version_dir: VERSION_DIR.to_string(),
            backup_dir: BACKUP_DIR.to_string(),
            labels_file: LABELS_FILE.to_string(),
        }
    }

    pub fn storage_path(&self) -> PathBuf {
        self.root.join(&self.storage_dir)
    }

    pub fn version_path(&self) -> PathBuf {
        self.root.join(&self.version_dir)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.root.join(&self.backup_dir)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.root.join(&self.labels_file)
    }
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self::new(".")
    }
}

/// What to do when the target filename already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Replace the existing file.
    #[default]
    Overwrite,
    /// Append `_1`, `_2`, ... before the extension until the name is free in
    /// both directories.
    Suffix,
}

/// Outcome of a successful store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreReceipt {
    /// Name actually used; differs from the requested one after suffixing.
    pub filename: String,
    pub primary_path: PathBuf,
    pub versioned_path: PathBuf,
    pub bytes: u64,
    pub sha256: String,
}

/// Compute the SHA-256 hex digest of stored content.
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Reject names that would resolve outside the store directories.
pub fn validate_filename(filename: &str) -> Result<()> {
    let unsafe_name = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains('\0');
    if unsafe_name {
        return Err(DatasetError::UnsafeFilename(filename.to_string()));
    }
    Ok(())
}

/// Writes datasets into the primary and version directories.
#[derive(Debug, Clone)]
pub struct VersionStore {
    layout: StoreLayout,
    collision: CollisionPolicy,
}

impl VersionStore {
    pub fn new(layout: StoreLayout) -> Self {
        Self {
            layout,
            collision: CollisionPolicy::default(),
        }
    }

    pub fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn collision(&self) -> CollisionPolicy {
        self.collision
    }

    /// Create the storage, version and backup directories.
    pub fn provision(&self) -> Result<()> {
        for dir in [
            self.layout.storage_path(),
            self.layout.version_path(),
            self.layout.backup_path(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| DatasetError::io(&dir, e))?;
        }
        debug!(root = %self.layout.root.display(), "Provisioned store directories");
        Ok(())
    }

    /// Write `content` under `filename` and mirror it into the version
    /// directory.
    pub fn store(&self, content: &str, filename: &str) -> Result<StoreReceipt> {
        validate_filename(filename)?;

        let storage = self.layout.storage_path();
        let versions = self.layout.version_path();
        for dir in [&storage, &versions] {
            std::fs::create_dir_all(dir).map_err(|e| DatasetError::io(dir, e))?;
        }

        let filename = self.resolve_filename(filename);
        let primary_path = storage.join(&filename);
        let versioned_path = versions.join(&filename);

        std::fs::write(&primary_path, content)
            .map_err(|e| DatasetError::io(&primary_path, e))?;
        std::fs::copy(&primary_path, &versioned_path)
            .map_err(|e| DatasetError::io(&versioned_path, e))?;

        let receipt = StoreReceipt {
            sha256: compute_checksum(content.as_bytes()),
            bytes: content.len() as u64,
            filename,
            primary_path,
            versioned_path,
        };
        info!(
            filename = %receipt.filename,
            bytes = receipt.bytes,
            sha256 = %receipt.sha256,
            "Stored dataset"
        );
        Ok(receipt)
    }

    /// Read a stored dataset, preferring the primary copy.
    pub fn read(&self, filename: &str) -> Result<String> {
        validate_filename(filename)?;
        for path in [
            self.layout.storage_path().join(filename),
            self.layout.version_path().join(filename),
        ] {
            match std::fs::read_to_string(&path) {
                Ok(content) => return Ok(content),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(DatasetError::io(&path, e)),
            }
        }
        Err(DatasetError::NotFound(filename.to_string()))
    }

    /// Apply the collision policy to a requested name.
    fn resolve_filename(&self, filename: &str) -> String {
        if !self.is_taken(filename) {
            return filename.to_string();
        }
        if self.collision == CollisionPolicy::Overwrite {
            debug!(filename, "Overwriting existing dataset");
            return filename.to_string();
        }

        let (stem, ext) = match Path::new(filename).extension().and_then(|e| e.to_str()) {
            Some(ext) => (&filename[..filename.len() - ext.len() - 1], Some(ext)),
            None => (filename, None),
        };
        let mut n = 1u32;
        loop {
            let candidate = match ext {
                Some(ext) => format!("{}_{}.{}", stem, n, ext),
                None => format!("{}_{}", stem, n),
            };
            if !self.is_taken(&candidate) {
                debug!(requested = filename, resolved = %candidate, "Suffixed colliding filename");
                return candidate;
            }
            n += 1;
        }
    }

    fn is_taken(&self, filename: &str) -> bool {
        self.layout.storage_path().join(filename).exists()
            || self.layout.version_path().join(filename).exists()
    }
}
