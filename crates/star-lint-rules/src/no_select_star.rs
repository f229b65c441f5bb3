//! Rule to forbid wildcard projections (`SELECT *`, `SELECT t.*`).
//!
//! # Rationale
//!
//! Wildcard projections let upstream schema changes leak silently into
//! downstream models. Enumerating columns keeps a model's contract explicit.
//!
//! # Detected Patterns
//!
//! - `SELECT *`
//! - `SELECT t.*`
//!
//! # Allowed Patterns
//!
//! - `COUNT(*)` and other function-argument stars
//!
//! # Configuration
//!
//! - `target_model_prefixes`: comma-separated file name prefixes (or a list).
//!   Only files whose base name starts with one of them are checked. Empty or
//!   unset checks every file.
//!
//! ```toml
//! [rules.no-select-star]
//! target_model_prefixes = "stg_, int_"
//! ```
//!
//! # Suppression
//!
//! - `-- noqa: NS01` on the offending line

use serde::Deserialize;
use star_lint_core::utils::base_file_name;
use star_lint_core::{
    Config, FileContext, Rule, RuleConfig, Segment, SegmentKind, Severity, Suggestion, Violation,
};
use std::path::Path;

/// Rule code for no-select-star.
pub const CODE: &str = "NS01";

/// Rule name for no-select-star.
pub const NAME: &str = "no-select-star";

/// Display name used in messages when the file name is unknown.
pub const UNKNOWN_FILE: &str = "unknown_file";

/// Configuration key holding the prefix list.
const PREFIXES_KEY: &str = "target_model_prefixes";

/// An allow-list of file name prefixes.
///
/// Holds only trimmed, non-empty prefixes in configuration order. An empty
/// filter means filtering is disabled, not that nothing matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixFilter {
    prefixes: Vec<String>,
}

impl PrefixFilter {
    /// Returns a filter that lets every file through.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Parses a comma-separated prefix list such as `"stg_, int_"`.
    ///
    /// `None`, empty and all-whitespace input yield the disabled filter.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        raw.map_or_else(Self::disabled, |s| Self::from_prefixes(s.split(',')))
    }

    /// Builds a filter from individual prefixes, trimming and dropping empties.
    #[must_use]
    pub fn from_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|p| p.as_ref().trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Returns true if the filter restricts which files are checked.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.prefixes.is_empty()
    }

    /// Returns the normalized prefixes.
    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Returns true if `file_name` starts with any prefix (case-sensitive).
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.prefixes.iter().any(|p| file_name.starts_with(p.as_str()))
    }
}

/// Raw `target_model_prefixes` value: a comma-joined string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PrefixSetting {
    /// `target_model_prefixes = "stg_, int_"`
    Joined(String),
    /// `target_model_prefixes = ["stg_", "int_"]`
    List(Vec<String>),
}

/// Typed options of the no-select-star rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoSelectStarConfig {
    /// File name prefixes restricting which models are checked.
    #[serde(default)]
    pub target_model_prefixes: Option<PrefixSetting>,
}

impl NoSelectStarConfig {
    /// Reads the options from a rule configuration section.
    ///
    /// A value of the wrong type is ignored with a warning.
    #[must_use]
    pub fn from_rule_config(config: &RuleConfig) -> Self {
        let target_model_prefixes = config.get_option(PREFIXES_KEY);
        if target_model_prefixes.is_none() && config.options.contains_key(PREFIXES_KEY) {
            tracing::warn!(
                "{NAME}: `{PREFIXES_KEY}` must be a string or a list of strings; ignoring it"
            );
        }
        Self {
            target_model_prefixes,
        }
    }

    /// Normalizes the configured prefixes into a [`PrefixFilter`].
    #[must_use]
    pub fn prefix_filter(&self) -> PrefixFilter {
        match &self.target_model_prefixes {
            None => PrefixFilter::disabled(),
            Some(PrefixSetting::Joined(raw)) => PrefixFilter::parse(Some(raw)),
            Some(PrefixSetting::List(items)) => PrefixFilter::from_prefixes(items),
        }
    }
}

/// A reportable wildcard projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardFinding {
    /// The wildcard segment the finding points at.
    pub anchor: Segment,
    /// Human-readable message.
    pub message: String,
}

/// Decides whether a wildcard projection should be reported.
///
/// `node` must already be a [`SegmentKind::WildcardProjection`]; its kind is
/// not re-checked. With an enabled `filter`, the rule abstains when the file
/// is unknown or its base name matches no prefix.
#[must_use]
pub fn evaluate(
    node: &Segment,
    file: Option<&Path>,
    filter: &PrefixFilter,
) -> Option<WildcardFinding> {
    let file_name = file.map_or("", base_file_name);

    tracing::debug!(
        "{CODE} config - target_model_prefixes: {:?}, checking file: '{file_name}'",
        filter.prefixes()
    );

    if filter.is_enabled() && (file_name.is_empty() || !filter.matches(file_name)) {
        return None;
    }

    let display = if file_name.is_empty() {
        UNKNOWN_FILE
    } else {
        file_name
    };

    Some(WildcardFinding {
        anchor: node.clone(),
        message: format!("Forbidden wildcard projection found in '{display}': {}", node.raw),
    })
}

/// Forbids wildcard projections, optionally only in prefixed model files.
#[derive(Debug, Clone)]
pub struct NoSelectStar {
    /// Which files are checked.
    pub filter: PrefixFilter,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoSelectStar {
    fn default() -> Self {
        Self::new()
    }
}

impl NoSelectStar {
    /// Creates a new rule that checks every file.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: PrefixFilter::disabled(),
            severity: Severity::Error,
        }
    }

    /// Creates the rule from the `[rules.no-select-star]` (or `[rules.NS01]`) section.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let filter = config
            .rule(NAME, CODE)
            .map(NoSelectStarConfig::from_rule_config)
            .unwrap_or_default()
            .prefix_filter();
        Self::new().filter(filter)
    }

    /// Restricts the rule to files matching `filter`.
    #[must_use]
    pub fn filter(mut self, filter: PrefixFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoSelectStar {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Explicit column enumeration is required."
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn crawl_kinds(&self) -> &'static [SegmentKind] {
        &[SegmentKind::WildcardProjection]
    }

    fn check(&self, ctx: &FileContext, segment: &Segment) -> Option<Violation> {
        let finding = evaluate(segment, ctx.path, &self.filter)?;
        Some(
            Violation::new(
                CODE,
                NAME,
                self.severity,
                finding.anchor.location(ctx),
                finding.message,
            )
            .with_suggestion(Suggestion::new(
                "List the columns this model needs instead of selecting all of them",
            )),
        )
    }
}
