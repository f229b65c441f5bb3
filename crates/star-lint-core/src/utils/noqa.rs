//! Inline `noqa` suppression comments.
//!
//! Supports directives like:
//! ```text
//! SELECT * FROM users  -- noqa
//! SELECT * FROM users  -- noqa: NS01, other-rule
//! ```
//!
//! A directive applies to the line it is written on.

use std::collections::HashSet;

/// Parsed `noqa` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoqaDirective {
    /// Bare `-- noqa`: every rule is suppressed on the line.
    All,
    /// `-- noqa: A, B`: only the listed codes or names are suppressed.
    Rules(HashSet<String>),
}

impl NoqaDirective {
    /// Returns true if this directive suppresses the given rule.
    #[must_use]
    pub fn suppresses(&self, code: &str, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Rules(rules) => rules.iter().any(|r| {
                r.eq_ignore_ascii_case(code) || r.eq_ignore_ascii_case(name) || r == "all"
            }),
        }
    }
}

/// Checks whether the given 1-indexed `line` carries a `noqa` directive for a rule.
#[must_use]
pub fn check_noqa(content: &str, line: usize, code: &str, name: &str) -> bool {
    if line == 0 {
        return false;
    }

    content
        .lines()
        .nth(line - 1)
        .and_then(parse_noqa_directive)
        .is_some_and(|d| d.suppresses(code, name))
}

/// Parses a `noqa` directive from a source line.
///
/// Every `--` on the line is tried in turn, so a dash pair inside an earlier
/// string literal does not hide a trailing directive.
#[must_use]
pub fn parse_noqa_directive(line: &str) -> Option<NoqaDirective> {
    line.match_indices("--")
        .find_map(|(idx, _)| parse_comment(&line[idx + 2..]))
}

fn parse_comment(comment: &str) -> Option<NoqaDirective> {
    let comment = comment.trim();
    let keyword = comment.get(..4)?;
    if !keyword.eq_ignore_ascii_case("noqa") {
        return None;
    }

    let rest = comment[4..].trim_start();
    if rest.is_empty() {
        return Some(NoqaDirective::All);
    }

    let list = rest.strip_prefix(':')?;
    let rules: HashSet<String> = list
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        Some(NoqaDirective::All)
    } else {
        Some(NoqaDirective::Rules(rules))
    }
}
