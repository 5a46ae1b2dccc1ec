//! Semantic validation of a parsed [`Config`].

use super::{Config, ConfigError};

/// Check what serde cannot: usable directory names and compilable patterns.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    for (field, value) in [
        ("storage_dir", &config.storage_dir),
        ("version_dir", &config.version_dir),
        ("backup_dir", &config.backup_dir),
        ("labels_file", &config.labels_file),
    ] {
        check_component(field, value)?;
    }

    if config.storage_dir == config.version_dir {
        return Err(ConfigError::ValidationError(format!(
            "storage_dir and version_dir must differ (both {:?})",
            config.storage_dir
        )));
    }

    config
        .scrub
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("scrub: {}", e)))?;

    Ok(())
}

fn check_component(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{} must not be empty",
            field
        )));
    }
    if value == "." || value == ".." || value.contains('/') || value.contains('\\') {
        return Err(ConfigError::ValidationError(format!(
            "{} must be a single directory name, got {:?}",
            field, value
        )));
    }
    Ok(())
}
