//! Configuration loading and validation.
//!
//! This module handles:
//! - Loading `config.json` with serde defaults for every field
//! - Config resolution order (CLI > env > XDG > defaults)
//! - Semantic validation (directory names, scrub patterns)

pub mod validation;

pub use validation::validate_config;

use dc_dataset::{
    CollisionPolicy, OddParagraphPolicy, StoreLayout, TagPolicy, BACKUP_DIR, LABELS_FILE,
    STORAGE_DIR, VERSION_DIR,
};
use dc_redact::ScrubPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG: &str = "DC_CONFIG";

/// Default XDG config directory name.
const CONFIG_DIR_NAME: &str = "dataset_creator";

/// Config file name inside the XDG directory.
const CONFIG_FILE_NAME: &str = "config.json";

/// Number of records shown in previews.
pub const DEFAULT_PREVIEW_LEN: usize = 3;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(String),
}

/// Pipeline and storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the store layout is rooted at.
    pub root: PathBuf,
    pub storage_dir: String,
    pub version_dir: String,
    pub backup_dir: String,
    pub labels_file: String,
    pub odd_paragraph: OddParagraphPolicy,
    pub collision: CollisionPolicy,
    pub tag_policy: TagPolicy,
    /// Records shown by `create` and `preview`.
    pub preview_len: usize,
    /// Extra scrub rules on top of the built-ins.
    pub scrub: ScrubPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            storage_dir: STORAGE_DIR.to_string(),
            version_dir: VERSION_DIR.to_string(),
            backup_dir: BACKUP_DIR.to_string(),
            labels_file: LABELS_FILE.to_string(),
            odd_paragraph: OddParagraphPolicy::default(),
            collision: CollisionPolicy::default(),
            tag_policy: TagPolicy::default(),
            preview_len: DEFAULT_PREVIEW_LEN,
            scrub: ScrubPolicy::default(),
        }
    }
}

impl Config {
    /// Parse and validate config JSON.
    pub fn from_json(json: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Store layout described by this config.
    pub fn layout(&self) -> StoreLayout {
        StoreLayout {
            root: self.root.clone(),
            storage_dir: self.storage_dir.clone(),
            version_dir: self.version_dir.clone(),
            backup_dir: self.backup_dir.clone(),
            labels_file: self.labels_file.clone(),
        }
    }
}

/// Resolved configuration with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: Config,
    /// File the config came from (None if using defaults).
    pub source: Option<PathBuf>,
}

/// Configuration resolution options.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Explicit config file (highest priority).
    pub config_path: Option<PathBuf>,
    /// Root directory override, applied after loading.
    pub root: Option<PathBuf>,
}

/// Load configuration with the standard resolution order.
///
/// Resolution order (highest to lowest priority):
/// 1. Explicit CLI flag (via ConfigOptions)
/// 2. Environment variable (DC_CONFIG)
/// 3. XDG config home (~/.config/dataset_creator/config.json), if present
/// 4. Built-in defaults
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let env_path = std::env::var(ENV_CONFIG).ok().filter(|v| !v.is_empty());
    let candidate = resolve_config_path(
        options.config_path.as_deref(),
        env_path.as_deref(),
        &xdg_config_home(),
    );
    load_from_candidate(candidate, options.root.as_deref())
}

/// Where a config file may come from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Candidate {
    /// Named explicitly; must exist.
    Required(PathBuf),
    /// XDG default; used only if present.
    Optional(PathBuf),
}

fn resolve_config_path(explicit: Option<&Path>, env: Option<&str>, xdg_home: &Path) -> Candidate {
    if let Some(path) = explicit {
        return Candidate::Required(path.to_path_buf());
    }
    if let Some(path) = env {
        return Candidate::Required(PathBuf::from(path));
    }
    Candidate::Optional(xdg_home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        })
}

fn load_from_candidate(
    candidate: Candidate,
    root_override: Option<&Path>,
) -> Result<ResolvedConfig, ConfigError> {
    let (mut config, source) = match candidate {
        Candidate::Required(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound { path });
            }
            (load_config_file(&path)?, Some(path))
        }
        Candidate::Optional(path) if path.exists() => (load_config_file(&path)?, Some(path)),
        Candidate::Optional(_) => (Config::default(), None),
    };

    if let Some(root) = root_override {
        config.root = root.to_path_buf();
    }

    debug!(
        source = ?source,
        root = %config.root.display(),
        "Resolved configuration"
    );
    Ok(ResolvedConfig { config, source })
}

/// Load and validate a config file.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Config::from_json(&content, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.storage_dir, "saved_datasets");
        assert_eq!(config.version_dir, "versioned_datasets");
        assert_eq!(config.backup_dir, "backup_datasets");
        assert_eq!(config.labels_file, "version_labels.json");
        assert_eq!(config.preview_len, 3);
        assert_eq!(config.odd_paragraph, OddParagraphPolicy::Drop);
        assert_eq!(config.collision, CollisionPolicy::Overwrite);
        assert_eq!(config.tag_policy, TagPolicy::Compat);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = Config::from_json(
            r#"{"collision": "suffix", "tag_policy": "strict", "preview_len": 5}"#,
            Path::new("config.json"),
        )
        .unwrap();
        assert_eq!(config.collision, CollisionPolicy::Suffix);
        assert_eq!(config.tag_policy, TagPolicy::Strict);
        assert_eq!(config.preview_len, 5);
        assert_eq!(config.storage_dir, "saved_datasets");
    }

    #[test]
    fn test_scrub_section_parsed() {
        let config = Config::from_json(
            r#"{"scrub": {"extras": ["ssn"], "extra_rules": [{"name": "mrn", "pattern": "MRN-\\d+", "token": "[REDACTED_MRN]"}]}}"#,
            Path::new("config.json"),
        )
        .unwrap();
        assert_eq!(config.scrub.extra_rules.len(), 1);
        assert_eq!(config.scrub.extras.len(), 1);
    }

    #[test]
    fn test_invalid_json() {
        let err = Config::from_json("{", Path::new("c.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_resolution_order() {
        let xdg = Path::new("/xdg");
        assert_eq!(
            resolve_config_path(Some(Path::new("/cli.json")), Some("/env.json"), xdg),
            Candidate::Required(PathBuf::from("/cli.json"))
        );
        assert_eq!(
            resolve_config_path(None, Some("/env.json"), xdg),
            Candidate::Required(PathBuf::from("/env.json"))
        );
        assert_eq!(
            resolve_config_path(None, None, xdg),
            Candidate::Optional(PathBuf::from("/xdg/dataset_creator/config.json"))
        );
    }

    #[test]
    fn test_required_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_from_candidate(Candidate::Required(dir.path().join("nope.json")), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_optional_missing_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let resolved =
            load_from_candidate(Candidate::Optional(dir.path().join("nope.json")), None).unwrap();
        assert!(resolved.source.is_none());
        assert_eq!(resolved.config.preview_len, DEFAULT_PREVIEW_LEN);
    }

    #[test]
    fn test_root_override_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"root": "/from/file"}"#).unwrap();
        let resolved =
            load_from_candidate(Candidate::Required(path.clone()), Some(Path::new("/cli"))).unwrap();
        assert_eq!(resolved.config.root, PathBuf::from("/cli"));
        assert_eq!(resolved.source, Some(path));
    }

    #[test]
    fn test_layout_uses_configured_names() {
        let mut config = Config::default();
        config.root = PathBuf::from("/data");
        config.version_dir = "history".to_string();
        let layout = config.layout();
        assert_eq!(layout.version_path(), PathBuf::from("/data/history"));
        assert_eq!(layout.storage_path(), PathBuf::from("/data/saved_datasets"));
    }
}
