//! star-lint CLI tool.
//!
//! Usage:
//! ```bash
//! star-lint check [OPTIONS] [PATH]
//! star-lint list-rules
//! star-lint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use star_lint_core::Dialect;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Linter for wildcard projections in SQL model files
#[derive(Parser)]
#[command(name = "star-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lint checks
    Check {
        /// Path to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names, codes or groups)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// SQL dialect (overrides `analyzer.dialect` from config)
        #[arg(long, env = "STAR_LINT_DIALECT")]
        dialect: Option<Dialect>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Source snippets rendered with miette.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            exclude,
            dialect,
        } => {
            let source = config_resolver::resolve(&path, cli.config.as_deref());
            let options = commands::check::CheckOptions {
                format,
                rules,
                exclude,
                dialect,
            };
            let clean = commands::check::run(&path, &options, &source)?;
            if !clean {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::ListRules => {
            let source = config_resolver::resolve(std::path::Path::new("."), cli.config.as_deref());
            commands::list_rules::run(&source)
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
