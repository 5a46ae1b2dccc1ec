//! Version labels.
//!
//! Labels live in one JSON object mapping dataset filename to label,
//! pretty-printed and rewritten wholesale on every change. Writers in this
//! process are serialized by a lock keyed on the label file's path, shared by
//! every [`LabelStore`] pointing at that file; the file is re-read under the
//! lock so a write never discards entries persisted since the last load.
//! Separate processes writing the same file can still lose updates (last
//! writer wins).

use crate::{DatasetError, Result};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Filename to label.
pub type VersionLabelMap = BTreeMap<String, String>;

/// One writer lock per label file in this process.
static FILE_LOCKS: Lazy<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Distinguishes temp files of concurrent writers within one process.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

fn lock_for(path: &Path) -> Arc<Mutex<()>> {
    let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut locks = FILE_LOCKS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(locks.entry(key).or_default())
}

/// Persistent label map with a single-writer lock per file.
#[derive(Debug)]
pub struct LabelStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl LabelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock = lock_for(&path);
        Self { path, lock }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the map; an absent file is an empty map.
    pub fn load(&self) -> Result<VersionLabelMap> {
        read_labels(&self.path)
    }

    /// Look up one label.
    pub fn get(&self, filename: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(filename))
    }

    /// Set or replace the label for `filename` and persist the whole map.
    ///
    /// Returns the map as written.
    pub fn label_version(&self, filename: &str, label: &str) -> Result<VersionLabelMap> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut labels = read_labels(&self.path)?;
        let previous = labels.insert(filename.to_string(), label.to_string());
        write_json_pretty_atomic(&self.path, &labels)?;

        info!(
            filename,
            label,
            replaced = previous.is_some(),
            total = labels.len(),
            "Recorded version label"
        );
        Ok(labels)
    }
}

fn read_labels(path: &Path) -> Result<VersionLabelMap> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(VersionLabelMap::new()),
        Err(e) => return Err(DatasetError::io(path, e)),
    };
    serde_json::from_str(&content).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json_pretty_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DatasetError::io(parent, e))?;
    }
    let content = serde_json::to_vec_pretty(value).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("version_labels.json");
    let tmp_path = path.with_file_name(format!(
        "{}.tmp.{}.{}",
        file_name,
        std::process::id(),
        TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    {
        let mut file =
            std::fs::File::create(&tmp_path).map_err(|e| DatasetError::io(&tmp_path, e))?;
        file.write_all(&content)
            .map_err(|e| DatasetError::io(&tmp_path, e))?;
        let _ = file.sync_all();
    }
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(DatasetError::io(path, e));
    }
    Ok(())
}
