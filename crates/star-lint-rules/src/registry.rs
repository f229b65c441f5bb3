//! Rule registry: builds configured rule instances by name or code.

use crate::no_select_star::{self, NoSelectStar};
use star_lint_core::{Config, RuleBox};

/// Returns every built-in rule, configured from `config`.
#[must_use]
pub fn all_rules(config: &Config) -> Vec<RuleBox> {
    vec![Box::new(NoSelectStar::from_config(config))]
}

/// Rules picked by [`select_rules`], plus the keys that matched nothing.
pub struct RuleSelection {
    /// Configured rule instances, in request order without duplicates.
    pub rules: Vec<RuleBox>,
    /// Requested keys that name no built-in rule.
    pub unknown: Vec<String>,
}

/// Selects rules by name, code or group (`all`).
///
/// Keys are matched case-insensitively.
#[must_use]
pub fn select_rules<S: AsRef<str>>(keys: &[S], config: &Config) -> RuleSelection {
    let mut rules: Vec<RuleBox> = Vec::new();
    let mut unknown = Vec::new();

    for key in keys {
        let key = key.as_ref().trim();
        if key.is_empty() {
            continue;
        }

        let matched: Vec<RuleBox> = all_rules(config)
            .into_iter()
            .filter(|rule| {
                key.eq_ignore_ascii_case(rule.name())
                    || key.eq_ignore_ascii_case(rule.code())
                    || rule.groups().iter().any(|g| key.eq_ignore_ascii_case(g))
            })
            .collect();

        if matched.is_empty() {
            unknown.push(key.to_string());
        }

        for rule in matched {
            if !rules.iter().any(|r| r.code() == rule.code()) {
                rules.push(rule);
            }
        }
    }

    RuleSelection { rules, unknown }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules() {
        let rules = all_rules(&Config::default());
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].code(), no_select_star::CODE);
    }

    #[test]
    fn test_select_by_name_code_and_group() {
        let config = Config::default();
        for key in ["no-select-star", "ns01", "all"] {
            let selection = select_rules(&[key], &config);
            assert_eq!(selection.rules.len(), 1, "key {key}");
            assert!(selection.unknown.is_empty());
        }
    }

    #[test]
    fn test_select_deduplicates_and_reports_unknown() {
        let selection = select_rules(&["NS01", "no-select-star", " ", "LT01"], &Config::default());
        assert_eq!(selection.rules.len(), 1);
        assert_eq!(selection.unknown, vec!["LT01".to_string()]);
    }
}
