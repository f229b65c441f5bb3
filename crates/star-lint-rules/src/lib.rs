//! # star-lint-rules
//!
//! Built-in lint rules for star-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | NS01 | `no-select-star` | Forbids wildcard projections (`SELECT *`, `t.*`) |
//!
//! ## Usage
//!
//! ```ignore
//! use star_lint_core::{Analyzer, Config};
//! use star_lint_rules::all_rules;
//!
//! let config = Config::from_file("star-lint.toml".as_ref())?;
//! let mut builder = Analyzer::builder().root("./models");
//! for rule in all_rules(&config) {
//!     builder = builder.rule_box(rule);
//! }
//! let result = builder.config(config).build()?.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod no_select_star;
mod registry;

pub use no_select_star::{
    evaluate, NoSelectStar, NoSelectStarConfig, PrefixFilter, PrefixSetting, WildcardFinding,
};
pub use registry::{all_rules, select_rules, RuleSelection};

/// Re-export core types for convenience.
pub use star_lint_core::{Rule, Severity, Violation};
