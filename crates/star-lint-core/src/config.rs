//! Configuration types for star-lint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::dialect::Dialect;

/// Top-level configuration for star-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations, keyed by rule name or rule code.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Gets the configuration section for a rule.
    ///
    /// A section keyed by the rule name wins over one keyed by its code.
    #[must_use]
    pub fn rule(&self, name: &str, code: &str) -> Option<&RuleConfig> {
        self.rules.get(name).or_else(|| self.rules.get(code))
    }

    /// Checks if a rule is enabled. Rules are enabled unless configured otherwise.
    #[must_use]
    pub fn is_rule_enabled(&self, name: &str, code: &str) -> bool {
        self.rule(name, code)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, name: &str, code: &str) -> Option<crate::Severity> {
        self.rule(name, code).and_then(|c| c.severity)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// SQL dialect used to parse model files.
    #[serde(default)]
    pub dialect: Dialect,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Whether a file that fails to parse aborts the run.
    #[serde(default)]
    pub fail_on_parse_error: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            dialect: Dialect::default(),
            exclude: vec![
                "**/target/**".to_string(),
                "**/dbt_packages/**".to_string(),
            ],
            respect_gitignore: true,
            fail_on_parse_error: false,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<crate::Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets an option value as a specific type.
    #[must_use]
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| v.clone().try_into().ok())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert_eq!(config.analyzer.dialect, Dialect::Ansi);
        assert!(config.rules.is_empty());
        assert!(config.is_rule_enabled("no-select-star", "NS01"));
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[analyzer]
root = "./models"
dialect = "bigquery"
exclude = ["**/snapshots/**"]

[rules.no-select-star]
enabled = true
severity = "warning"
target_model_prefixes = "stg_, int_"
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.root, PathBuf::from("./models"));
        assert_eq!(config.analyzer.dialect, Dialect::BigQuery);
        assert!(config.is_rule_enabled("no-select-star", "NS01"));
        assert_eq!(
            config.rule_severity("no-select-star", "NS01"),
            Some(crate::Severity::Warning)
        );

        let rule_config = config.rule("no-select-star", "NS01").unwrap();
        assert_eq!(
            rule_config.get_option::<String>("target_model_prefixes"),
            Some("stg_, int_".to_string())
        );
    }

    #[test]
    fn test_rule_lookup_by_code() {
        let config = Config::parse("[rules.NS01]\nenabled = false\n").unwrap();
        assert!(!config.is_rule_enabled("no-select-star", "NS01"));
        assert!(config.is_rule_enabled("other-rule", "XX01"));
    }

    #[test]
    fn test_name_section_wins_over_code_section() {
        let toml = r#"
[rules.NS01]
severity = "info"

[rules.no-select-star]
severity = "error"
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(
            config.rule_severity("no-select-star", "NS01"),
            Some(crate::Severity::Error)
        );
    }

    #[test]
    fn test_string_array_option() {
        let config =
            Config::parse("[rules.no-select-star]\ntarget_model_prefixes = [\"stg_\", \"int_\"]\n")
                .unwrap();
        let rule_config = config.rule("no-select-star", "NS01").unwrap();
        assert_eq!(
            rule_config.get_option::<Vec<String>>("target_model_prefixes"),
            Some(vec!["stg_".to_string(), "int_".to_string()])
        );
        assert_eq!(rule_config.get_option::<String>("target_model_prefixes"), None);
    }

    #[test]
    fn test_unknown_dialect_is_parse_error() {
        let err = Config::parse("[analyzer]\ndialect = \"oracle\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
