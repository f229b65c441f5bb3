//! # star-lint-core
//!
//! Core framework for linting SQL model files with `sqlparser`.
//!
//! This crate provides the host side of linting:
//!
//! - [`Rule`] trait for rules evaluated on classified SQL segments
//! - [`Segment`] and [`SegmentKind`] for what rules are shown
//! - [`Analyzer`] for parsing files and dispatching segments to rules
//! - [`Violation`] for representing lint findings
//!
//! ## Example
//!
//! ```ignore
//! use star_lint_core::{Analyzer, Config};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./models")
//!     .config(Config::from_file("star-lint.toml".as_ref())?)
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod dialect;
mod rule;
mod segment;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use dialect::Dialect;
pub use rule::{Rule, RuleBox};
pub use segment::{collect_segments, Segment, SegmentKind};
pub use types::{LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic};
