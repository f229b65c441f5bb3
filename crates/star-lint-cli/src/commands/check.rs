//! Check command implementation.

use anyhow::{Context, Result};
use star_lint_core::{Analyzer, Config, Dialect};
use star_lint_rules::{all_rules, select_rules};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Options of the check command.
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule filter.
    pub rules: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Dialect override.
    pub dialect: Option<Dialect>,
}

/// Loads the configuration the resolver pointed at.
pub fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(p) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", p.display());
    }
    Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
}

/// Runs the check command.
///
/// Returns `Ok(false)` when error-severity violations were found.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<bool> {
    let config = load_config(source)?;

    let rules = if let Some(filter) = &options.rules {
        let keys: Vec<&str> = filter.split(',').map(str::trim).collect();
        let selection = select_rules(&keys, &config);
        for key in &selection.unknown {
            tracing::warn!("Unknown rule: {}", key);
        }
        selection.rules
    } else {
        all_rules(&config)
    };

    let mut builder = Analyzer::builder()
        .root(path)
        .excludes(options.exclude.iter().cloned());
    if let Some(dialect) = options.dialect {
        builder = builder.dialect(dialect);
    }
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder
        .config(config)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {:?} with {} rules ({} dialect)",
        path,
        analyzer.rule_count(),
        analyzer.dialect()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, options.format, analyzer.report_base())?;

    Ok(!result.has_errors())
}
