//! Scrub policy configuration.
//!
//! The default rules are always applied. A policy only adds to them: opt-in
//! built-ins (`extras`) first, then custom rules, both after the defaults.

use crate::{BuiltinRule, RedactError, Result, ScrubRule};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Schema version for the policy file.
pub const POLICY_SCHEMA_VERSION: &str = "1.0.0";

/// Scrub policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrubPolicy {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Opt-in built-in rules appended after the defaults.
    #[serde(default)]
    pub extras: Vec<BuiltinRule>,

    /// Custom rules appended after the extras.
    #[serde(default)]
    pub extra_rules: Vec<RuleSpec>,
}

fn default_schema_version() -> String {
    POLICY_SCHEMA_VERSION.to_string()
}

impl Default for ScrubPolicy {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            extras: Vec::new(),
            extra_rules: Vec::new(),
        }
    }
}

/// Uncompiled custom rule as it appears in a policy file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Rule name, unique within the policy.
    pub name: String,
    /// Regex pattern (Rust `regex` syntax).
    pub pattern: String,
    /// Literal replacement token.
    pub token: String,
}

impl RuleSpec {
    /// Compile into a rule.
    pub fn compile(&self) -> Result<ScrubRule> {
        ScrubRule::new(&self.name, &self.pattern, &self.token)
    }
}

impl ScrubPolicy {
    /// Load a policy from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a policy from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: ScrubPolicy = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that custom rules compile, have tokens, and do not reuse names.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<&str> = BuiltinRule::DEFAULT_ORDER
            .iter()
            .chain(self.extras.iter())
            .map(BuiltinRule::name)
            .collect();

        for spec in &self.extra_rules {
            if spec.name.trim().is_empty() {
                return Err(RedactError::PolicyError(
                    "custom rule with empty name".to_string(),
                ));
            }
            if spec.token.is_empty() {
                return Err(RedactError::PolicyError(format!(
                    "rule '{}' has an empty replacement token",
                    spec.name
                )));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(RedactError::PolicyError(format!(
                    "duplicate rule name '{}'",
                    spec.name
                )));
            }
            spec.compile()?;
        }
        Ok(())
    }
}
