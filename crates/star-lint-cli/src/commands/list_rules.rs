//! List rules command implementation.

use anyhow::Result;
use star_lint_rules::all_rules;

use crate::config_resolver::ConfigSource;

/// Runs the list-rules command.
///
/// Shows whether each rule is enabled under the resolved configuration.
pub fn run(source: &ConfigSource) -> Result<()> {
    let config = super::check::load_config(source)?;

    println!("Available rules:\n");
    println!("{:<8} {:<18} {:<9} Description", "Code", "Name", "Enabled");
    println!("{}", "-".repeat(80));

    for rule in all_rules(&config) {
        let enabled = if config.is_rule_enabled(rule.name(), rule.code()) {
            "yes"
        } else {
            "no"
        };
        println!(
            "{:<8} {:<18} {:<9} {}",
            rule.code(),
            rule.name(),
            enabled,
            rule.description()
        );
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  star-lint check --rules no-select-star");
    println!("  star-lint check --rules NS01");

    Ok(())
}
