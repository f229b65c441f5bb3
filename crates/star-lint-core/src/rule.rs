//! Rule trait for defining lint rules.

use crate::context::FileContext;
use crate::segment::{Segment, SegmentKind};
use crate::types::{Severity, Violation};

/// A lint rule evaluated once per matching SQL segment.
///
/// Rules declare the segment kinds they care about through
/// [`crawl_kinds`](Rule::crawl_kinds). The analyzer never calls
/// [`check`](Rule::check) with a segment of any other kind, so rules do not
/// re-validate the category of what they receive.
///
/// # Example
///
/// ```ignore
/// use star_lint_core::{FileContext, Rule, Segment, SegmentKind, Violation};
///
/// pub struct NoCountStar;
///
/// impl Rule for NoCountStar {
///     fn name(&self) -> &'static str { "no-count-star" }
///     fn code(&self) -> &'static str { "CS01" }
///     fn crawl_kinds(&self) -> &'static [SegmentKind] { &[SegmentKind::FunctionStar] }
///
///     fn check(&self, ctx: &FileContext, segment: &Segment) -> Option<Violation> {
///         Some(Violation::new(
///             self.code(),
///             self.name(),
///             self.default_severity(),
///             segment.location(ctx),
///             "Use COUNT(1)",
///         ))
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "no-select-star").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "NS01").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the rule groups this rule belongs to.
    fn groups(&self) -> &'static [&'static str] {
        &["all"]
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Returns the segment kinds this rule is evaluated on.
    fn crawl_kinds(&self) -> &'static [SegmentKind];

    /// Evaluates a single segment.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context about the SQL source being checked
    /// * `segment` - A segment whose kind is listed in [`crawl_kinds`](Rule::crawl_kinds)
    ///
    /// # Returns
    ///
    /// A violation anchored on the segment, or `None` if the rule abstains.
    fn check(&self, ctx: &FileContext, segment: &Segment) -> Option<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST01"
        }
        fn description(&self) -> &'static str {
            "A test rule"
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
                "Test violation",
            ))
        }
    }

    #[test]
    fn test_rule_trait_defaults() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST01");
        assert_eq!(rule.groups(), &["all"]);
        assert_eq!(rule.default_severity(), Severity::Error);
    }

    #[test]
    fn test_check_anchors_on_segment() {
        let ctx = FileContext::for_string("SELECT COUNT(*) FROM t", Some("t.sql"));
        let segment = Segment::new(SegmentKind::FunctionStar, "COUNT(*)", 1, 8);
        let violation = TestRule.check(&ctx, &segment).unwrap();
        assert_eq!(violation.location.offset, 7);
        assert_eq!(violation.location.length, 8);
    }
}
