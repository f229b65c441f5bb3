//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::context::FileContext;
use crate::dialect::Dialect;
use crate::rule::{Rule, RuleBox};
use crate::segment::collect_segments;
use crate::types::{LintResult, Violation};
use crate::utils::noqa::check_noqa;
use crate::utils::paths::is_sql_file;

use sqlparser::parser::Parser;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking the project directory.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Error parsing a SQL source.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse (empty for bare strings).
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    dialect: Option<Dialect>,
    config: Option<Config>,
    fail_on_parse_error: Option<bool>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Overrides the SQL dialect from the configuration.
    #[must_use]
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: from config, else false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = Some(fail);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let excludes = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p).map(|g| (p.clone(), g)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            rules: self.rules,
            excludes,
            dialect: self.dialect.unwrap_or(config.analyzer.dialect),
            fail_on_parse_error: self
                .fail_on_parse_error
                .unwrap_or(config.analyzer.fail_on_parse_error),
            config,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    excludes: Vec<(String, glob::Pattern)>,
    dialect: Dialect,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the dialect used for parsing.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all SQL files under the root and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails, or if a file
    /// fails to parse while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?} ({} dialect)", self.root, self.dialect);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} SQL files to analyze", files.len());

        let base = self.report_base();
        for file_path in &files {
            debug!("Analyzing: {}", file_path.display());
            let outcome = match std::fs::read_to_string(file_path) {
                Ok(content) => self.check_source(&FileContext::new(file_path, &content, base)),
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    Err(AnalyzerError::Parse {
                        path: file_path.strip_prefix(base).unwrap_or(file_path).to_path_buf(),
                        message: e.to_string(),
                    })
                }
                Err(e) => return Err(e.into()),
            };

            match outcome {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                    result.unparsable.push(path);
                }
                Err(e) => return Err(e),
            }
        }

        result.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Lints a SQL string, optionally associated with a file name.
    ///
    /// The name only feeds rules that look at it (e.g. prefix filters); no
    /// file is read.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Parse`] if the SQL cannot be parsed.
    pub fn lint_string(&self, sql: &str, fname: Option<&str>) -> Result<LintResult, AnalyzerError> {
        let ctx = FileContext::for_string(sql, fname);
        let violations = self.check_source(&ctx)?;
        Ok(LintResult {
            violations,
            files_checked: 1,
            unparsable: Vec::new(),
        })
    }

    /// Parses one source and runs every enabled rule over its segments.
    fn check_source(&self, ctx: &FileContext) -> Result<Vec<Violation>, AnalyzerError> {
        let dialect = self.dialect.parser_dialect();
        let statements =
            Parser::parse_sql(&*dialect, ctx.content).map_err(|e| AnalyzerError::Parse {
                path: ctx.relative_path.clone(),
                message: e.to_string(),
            })?;

        let segments = collect_segments(&statements);
        debug!(
            "{}: {} statements, {} segments",
            ctx.relative_path.display(),
            statements.len(),
            segments.len()
        );

        let mut violations = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name(), rule.code()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let kinds = rule.crawl_kinds();
            let rule_violations: Vec<Violation> = segments
                .iter()
                .filter(|segment| kinds.contains(&segment.kind))
                .filter_map(|segment| rule.check(ctx, segment))
                .filter(|v| {
                    let suppressed = check_noqa(ctx.content, v.location.line, &v.code, &v.rule);
                    if suppressed {
                        debug!("Suppressed by noqa: {}", v);
                    }
                    !suppressed
                })
                .collect();

            violations.extend(self.apply_severity_override(rule.as_ref(), rule_violations));
        }

        Ok(violations)
    }

    /// Directory reported paths are relative to.
    ///
    /// A single-file root reports its path relative to the containing
    /// directory, so the file name is never lost.
    #[must_use]
    pub fn report_base(&self) -> &Path {
        if self.root.is_file() {
            self.root.parent().unwrap_or(&self.root)
        } else {
            &self.root
        }
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule: &dyn Rule,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule.name(), rule.code()) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    /// Discovers all SQL files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let respect_gitignore = self.config.analyzer.respect_gitignore;
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(respect_gitignore)
            .git_exclude(respect_gitignore)
            .ignore(respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type().is_some_and(|t| t.is_file()) || !is_sql_file(path) {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let relative_str = relative.to_string_lossy();

        self.excludes.iter().any(|(raw, pattern)| {
            if pattern.matches(&path_str) || pattern.matches(&relative_str) {
                return true;
            }

            // Also check as substring for patterns like "**/target/**"
            let normalized = raw.replace("**", "");
            !normalized.is_empty() && normalized != "/" && path_str.contains(&normalized)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{Segment, SegmentKind};
    use crate::types::Severity;
    use std::fs;
    use tempfile::TempDir;

    /// Flags every function star, to exercise dispatch without the real rules.
    struct FlagFunctionStar;

    impl Rule for FlagFunctionStar {
        fn name(&self) -> &'static str {
            "flag-function-star"
        }
        fn code(&self) -> &'static str {
            "FS01"
        }
        fn crawl_kinds(&self) -> &'static [SegmentKind] {
            &[SegmentKind::FunctionStar]
        }
        fn check(&self, ctx: &FileContext, segment: &Segment) -> Option<Violation> {
            Some(Violation::new(
                self.code(),
                self.name(),
                self.default_severity(),
                segment.location(ctx),
                format!("{} in '{}'", segment.raw, ctx.file_name()),
            ))
        }
    }

    fn analyzer_with(config: Config) -> Analyzer {
        Analyzer::builder()
            .root(".")
            .config(config)
            .rule(FlagFunctionStar)
            .build()
            .expect("Failed to build analyzer")
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .dialect(Dialect::Snowflake)
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.dialect(), Dialect::Snowflake);
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let result = Analyzer::builder().root(".").exclude("[").build();
        assert!(matches!(result, Err(AnalyzerError::Glob(_))));
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root("/project")
            .exclude("**/dbt_packages/**")
            .exclude("models/legacy/*.sql")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/project/dbt_packages/x/model.sql")));
        assert!(analyzer.should_exclude(Path::new("/project/models/legacy/old.sql")));
        assert!(!analyzer.should_exclude(Path::new("/project/models/stg_users.sql")));
    }

    #[test]
    fn test_dispatch_only_subscribed_kinds() {
        let analyzer = analyzer_with(Config::default());
        let result = analyzer
            .lint_string("SELECT *, COUNT(*) FROM users GROUP BY 1", Some("a.sql"))
            .unwrap();

        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].message, "COUNT(*) in 'a.sql'");
    }

    #[test]
    fn test_disabled_rule_is_skipped() {
        let config = Config::parse("[rules.FS01]\nenabled = false\n").unwrap();
        let result = analyzer_with(config)
            .lint_string("SELECT COUNT(*) FROM users", None)
            .unwrap();
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_severity_override() {
        let config = Config::parse("[rules.flag-function-star]\nseverity = \"info\"\n").unwrap();
        let result = analyzer_with(config)
            .lint_string("SELECT COUNT(*) FROM users", None)
            .unwrap();
        assert_eq!(result.violations[0].severity, Severity::Info);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_noqa_suppresses_on_same_line() {
        let analyzer = analyzer_with(Config::default());
        let sql = "SELECT COUNT(*) AS n -- noqa: FS01\nFROM users";
        assert!(analyzer.lint_string(sql, None).unwrap().violations.is_empty());

        let sql = "SELECT COUNT(*) AS n -- noqa: XX99\nFROM users";
        assert_eq!(analyzer.lint_string(sql, None).unwrap().violations.len(), 1);
    }

    #[test]
    fn test_lint_string_parse_error() {
        let err = analyzer_with(Config::default())
            .lint_string("SELEC * FROM", Some("broken.sql"))
            .unwrap_err();
        match err {
            AnalyzerError::Parse { path, .. } => assert_eq!(path, PathBuf::from("broken.sql")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_analyze_directory() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("models/staging")).unwrap();
        fs::create_dir_all(tmp.path().join("dbt_packages/utils")).unwrap();
        fs::write(
            tmp.path().join("models/staging/stg_users.sql"),
            "SELECT COUNT(*) FROM users",
        )
        .unwrap();
        fs::write(tmp.path().join("models/broken.sql"), "SELEC FROM").unwrap();
        fs::write(tmp.path().join("models/schema.yml"), "version: 2").unwrap();
        fs::write(
            tmp.path().join("dbt_packages/utils/macro.sql"),
            "SELECT COUNT(*) FROM vendored",
        )
        .unwrap();

        let analyzer = Analyzer::builder()
            .root(tmp.path())
            .rule(FlagFunctionStar)
            .build()
            .unwrap();
        let result = analyzer.analyze().unwrap();

        assert_eq!(result.files_checked, 1);
        assert_eq!(result.unparsable, vec![PathBuf::from("models/broken.sql")]);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(
            result.violations[0].location.file,
            PathBuf::from("models/staging/stg_users.sql")
        );
    }

    #[test]
    fn test_analyze_fails_on_parse_error_when_configured() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("broken.sql"), "SELEC FROM").unwrap();

        let analyzer = Analyzer::builder()
            .root(tmp.path())
            .fail_on_parse_error(true)
            .build()
            .unwrap();
        assert!(matches!(
            analyzer.analyze(),
            Err(AnalyzerError::Parse { .. })
        ));
    }

    #[test]
    fn test_single_file_root_reports_file_name() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("stg_users.sql");
        fs::write(&file, "SELECT COUNT(*) FROM users").unwrap();

        let analyzer = Analyzer::builder()
            .root(&file)
            .rule(FlagFunctionStar)
            .build()
            .unwrap();
        let result = analyzer.analyze().unwrap();

        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(
            result.violations[0].location.file,
            PathBuf::from("stg_users.sql")
        );
        assert!(result.violations[0]
            .to_string()
            .starts_with("stg_users.sql:1:8: error [FS01]"));
    }

    #[test]
    fn test_non_utf8_file_is_skipped_as_unparsable() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("stg_a.sql"), "SELECT COUNT(*) FROM a").unwrap();
        fs::write(tmp.path().join("stg_b.sql"), b"SELECT 'caf\xe9' FROM b").unwrap();

        let analyzer = Analyzer::builder()
            .root(tmp.path())
            .rule(FlagFunctionStar)
            .build()
            .unwrap();
        let result = analyzer.analyze().unwrap();

        assert_eq!(result.files_checked, 1);
        assert_eq!(result.unparsable, vec![PathBuf::from("stg_b.sql")]);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].location.file, PathBuf::from("stg_a.sql"));

        let strict = Analyzer::builder()
            .root(tmp.path())
            .fail_on_parse_error(true)
            .build()
            .unwrap();
        assert!(matches!(
            strict.analyze(),
            Err(AnalyzerError::Parse { path, .. }) if path == Path::new("stg_b.sql")
        ));
    }
}
