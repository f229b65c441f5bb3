//! End-to-end tests for `no-select-star` through the analyzer.
//!
//! These run real SQL through `sqlparser`, segment extraction, dispatch and
//! the rule, the way `star-lint check` does.

use star_lint_core::{Analyzer, Config, LintResult, Severity};
use star_lint_rules::no_select_star::CODE;
use star_lint_rules::{all_rules, NoSelectStar, PrefixFilter};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn config_with_prefixes(prefixes: Option<&str>) -> Config {
    let mut toml = String::from("[analyzer]\ndialect = \"bigquery\"\n");
    if let Some(prefixes) = prefixes {
        toml.push_str(&format!(
            "\n[rules.no-select-star]\ntarget_model_prefixes = \"{prefixes}\"\n"
        ));
    }
    Config::parse(&toml).expect("valid config")
}

fn linter(prefixes: Option<&str>) -> Analyzer {
    let config = config_with_prefixes(prefixes);
    let mut builder = Analyzer::builder().root(".");
    for rule in all_rules(&config) {
        builder = builder.rule_box(rule);
    }
    builder.config(config).build().expect("analyzer builds")
}

fn lint(analyzer: &Analyzer, sql: &str, fname: &str) -> LintResult {
    analyzer.lint_string(sql, Some(fname)).expect("SQL parses")
}

#[test]
fn prefix_match_returns_error() {
    let result = lint(&linter(Some("stg_")), "SELECT * FROM users", "stg_users.sql");

    let violations = result.by_code(CODE);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.contains("stg_users.sql"));
    assert!(violations[0].message.contains('*'));
    assert_eq!(violations[0].severity, Severity::Error);
}

#[test]
fn prefix_mismatch_skips() {
    let result = lint(&linter(Some("stg_")), "SELECT * FROM users", "mart_users.sql");
    assert!(result.by_code(CODE).is_empty());
}

#[test]
fn no_prefix_config_checks_all_files() {
    let result = lint(&linter(None), "SELECT * FROM users", "any_model.sql");
    assert_eq!(result.by_code(CODE).len(), 1);
}

#[test]
fn empty_prefix_config_checks_all_files() {
    let result = lint(&linter(Some("")), "SELECT * FROM users", "any_model.sql");
    assert_eq!(result.by_code(CODE).len(), 1);

    let result = lint(&linter(Some("  ")), "SELECT * FROM users", "any_model.sql");
    assert_eq!(result.by_code(CODE).len(), 1);
}

#[test]
fn count_star_is_allowed() {
    let result = lint(&linter(Some("stg_")), "SELECT COUNT(*) FROM users", "stg_users.sql");
    assert!(result.by_code(CODE).is_empty());
}

#[test]
fn table_wildcard_returns_error() {
    let result = lint(
        &linter(Some("stg_")),
        "SELECT t.* FROM users AS t",
        "stg_users.sql",
    );
    let violations = result.by_code(CODE);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.contains("t.*"));
}

#[test]
fn explicit_columns_pass() {
    let result = lint(&linter(Some("stg_")), "SELECT id, name FROM users", "stg_users.sql");
    assert!(result.violations.is_empty());
}

#[test]
fn multiple_prefixes() {
    let analyzer = linter(Some("stg_, int_"));
    let sql = "SELECT * FROM users";

    assert_eq!(lint(&analyzer, sql, "stg_users.sql").by_code(CODE).len(), 1);
    assert_eq!(lint(&analyzer, sql, "int_orders.sql").by_code(CODE).len(), 1);
    assert!(lint(&analyzer, sql, "mart_data.sql").by_code(CODE).is_empty());
}

#[test]
fn unnamed_source_with_filter_abstains() {
    let analyzer = linter(Some("stg_"));
    let result = analyzer.lint_string("SELECT * FROM users", None).unwrap();
    assert!(result.violations.is_empty());
}

#[test]
fn unnamed_source_without_filter_uses_placeholder() {
    let analyzer = linter(None);
    let result = analyzer.lint_string("SELECT * FROM users", None).unwrap();
    assert_eq!(result.violations.len(), 1);
    assert!(result.violations[0].message.contains("'unknown_file'"));
    assert_eq!(result.violations[0].location.file, PathBuf::new());
}

#[test]
fn every_wildcard_is_reported_once() {
    let sql = "WITH base AS (SELECT * FROM raw.users)\n\
               SELECT b.*, COUNT(*) OVER () AS total\n\
               FROM base AS b";
    let result = lint(&linter(None), sql, "stg_users.sql");

    let lines: Vec<usize> = result.violations.iter().map(|v| v.location.line).collect();
    assert_eq!(lines, vec![1, 2]);
}

#[test]
fn noqa_suppresses_the_line() {
    let sql = "SELECT *  -- noqa: NS01\nFROM users";
    assert!(lint(&linter(None), sql, "stg_users.sql").violations.is_empty());
}

#[test]
fn rule_can_be_disabled_by_code() {
    let config = Config::parse("[rules.NS01]\nenabled = false\n").unwrap();
    let analyzer = Analyzer::builder()
        .root(".")
        .rule(NoSelectStar::from_config(&config))
        .config(config)
        .build()
        .unwrap();
    assert!(lint(&analyzer, "SELECT * FROM users", "stg_users.sql")
        .violations
        .is_empty());
}

#[test]
fn analyze_project_directory() {
    let tmp = TempDir::new().unwrap();
    let models = tmp.path().join("models");
    fs::create_dir_all(&models).unwrap();
    fs::write(models.join("stg_users.sql"), "SELECT *\nFROM raw.users\n").unwrap();
    fs::write(models.join("int_orders.sql"), "SELECT o.* FROM raw.orders AS o\n").unwrap();
    fs::write(models.join("mart_users.sql"), "SELECT * FROM stg_users\n").unwrap();

    let config = Config::parse(
        "[rules.no-select-star]\nseverity = \"warning\"\ntarget_model_prefixes = [\"stg_\", \"int_\"]\n",
    )
    .unwrap();

    let analyzer = Analyzer::builder()
        .root(tmp.path())
        .rule(NoSelectStar::from_config(&config))
        .config(config)
        .build()
        .unwrap();
    let result = analyzer.analyze().unwrap();

    assert_eq!(result.files_checked, 3);
    let files: Vec<PathBuf> = result
        .violations
        .iter()
        .map(|v| v.location.file.clone())
        .collect();
    assert_eq!(
        files,
        vec![
            PathBuf::from("models/int_orders.sql"),
            PathBuf::from("models/stg_users.sql"),
        ]
    );
    assert!(result.violations.iter().all(|v| v.severity == Severity::Warning));
    assert!(!result.has_errors());
}

#[test]
fn programmatic_filter() {
    let analyzer = Analyzer::builder()
        .root(".")
        .rule(NoSelectStar::new().filter(PrefixFilter::from_prefixes(["int_"])))
        .build()
        .unwrap();
    assert!(lint(&analyzer, "SELECT * FROM x", "stg_x.sql").violations.is_empty());
    assert_eq!(lint(&analyzer, "SELECT * FROM x", "int_x.sql").violations.len(), 1);
}
