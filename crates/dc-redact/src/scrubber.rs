//! The scrubber: ordered application of redaction rules.

use crate::{BuiltinRule, Result, ScrubPolicy, ScrubRule};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

static DEFAULT_SCRUBBER: Lazy<Scrubber> = Lazy::new(Scrubber::new);

/// Scrub `text` with the four default rules.
pub fn scrub(text: &str) -> String {
    DEFAULT_SCRUBBER.scrub(text)
}

/// Replacement count for one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleHit {
    /// Rule name.
    pub rule: String,
    /// Number of replacements made.
    pub replacements: usize,
}

/// Per-rule replacement counts, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubReport {
    pub hits: Vec<RuleHit>,
}

impl ScrubReport {
    /// Total replacements across all rules.
    pub fn total(&self) -> usize {
        self.hits.iter().map(|h| h.replacements).sum()
    }

    /// Replacements made by a named rule.
    pub fn count_for(&self, rule: &str) -> usize {
        self.hits
            .iter()
            .filter(|h| h.rule == rule)
            .map(|h| h.replacements)
            .sum()
    }

    /// Fold another report into this one, matching rules by name.
    pub fn merge(&mut self, other: &ScrubReport) {
        for hit in &other.hits {
            match self.hits.iter_mut().find(|h| h.rule == hit.rule) {
                Some(existing) => existing.replacements += hit.replacements,
                None => self.hits.push(hit.clone()),
            }
        }
    }
}

/// Scrubbed text plus what was replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubbedText {
    pub text: String,
    pub report: ScrubReport,
}

/// Applies an ordered list of rules to text.
///
/// Each rule runs over the output of the previous one, replacing all
/// non-overlapping matches left to right.
#[derive(Debug, Clone)]
pub struct Scrubber {
    rules: Vec<ScrubRule>,
}

impl Scrubber {
    /// Scrubber with the default rules in canonical order.
    pub fn new() -> Self {
        Self::with_rules(
            BuiltinRule::DEFAULT_ORDER
                .iter()
                .map(BuiltinRule::rule)
                .collect(),
        )
    }

    /// Scrubber with an explicit rule list. No defaults are added.
    pub fn with_rules(rules: Vec<ScrubRule>) -> Self {
        Self { rules }
    }

    /// Default rules followed by the policy's extras and custom rules.
    pub fn from_policy(policy: &ScrubPolicy) -> Result<Self> {
        let mut scrubber = Self::new();
        for extra in &policy.extras {
            scrubber = scrubber.with_rule(extra.rule());
        }
        for spec in &policy.extra_rules {
            scrubber = scrubber.with_rule(spec.compile()?);
        }
        debug!(rules = scrubber.rules.len(), "Scrubber built from policy");
        Ok(scrubber)
    }

    /// Append a rule after the existing ones.
    pub fn with_rule(mut self, rule: ScrubRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The rules in application order.
    pub fn rules(&self) -> &[ScrubRule] {
        &self.rules
    }

    /// Apply every rule in order.
    pub fn scrub(&self, text: &str) -> String {
        self.scrub_with_report(text).text
    }

    /// Apply every rule in order and count replacements per rule.
    pub fn scrub_with_report(&self, text: &str) -> ScrubbedText {
        let mut current = text.to_string();
        let mut report = ScrubReport::default();

        for rule in &self.rules {
            let (out, replacements) = rule.apply(&current);
            if replacements > 0 {
                current = out.into_owned();
            }
            report.hits.push(RuleHit {
                rule: rule.name().to_string(),
                replacements,
            });
        }

        ScrubbedText {
            text: current,
            report,
        }
    }

    /// Whether any rule still matches `text`.
    pub fn has_matches(&self, text: &str) -> bool {
        self.rules.iter().any(|r| r.is_match(text))
    }
}

impl Default for Scrubber {
    fn default() -> Self {
        Self::new()
    }
}
