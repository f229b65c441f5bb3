//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# star-lint configuration

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./models"

# SQL dialect: ansi, bigquery, postgres, snowflake, mysql, duckdb
dialect = "ansi"

# Glob patterns to exclude from analysis
exclude = [
    "**/target/**",
    "**/dbt_packages/**",
]

# Respect .gitignore files
respect_gitignore = true

# Abort when a model cannot be parsed (default: skip it with a warning)
# fail_on_parse_error = false

[rules.no-select-star]
enabled = true
# severity = "warning"  # Override default severity
# Only check models whose file name starts with one of these prefixes.
# Leave empty to check every model.
target_model_prefixes = ""
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("star-lint.toml"), force)?;

    println!("Created star-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit star-lint.toml to configure rules");
    println!("  2. Run: star-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
