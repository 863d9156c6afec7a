//! List elements command implementation.

use anyhow::Result;
use boundary_lint_core::ruleset::rule_label;
use boundary_lint_core::BoundaryChecker;

use crate::config_resolver::ConfigSource;

/// Runs the list-elements command.
pub fn run(source: &ConfigSource) -> Result<()> {
    let checker = super::load_checker(source);
    print_elements(&checker);
    println!();
    print_rules(&checker);
    Ok(())
}

fn print_elements(checker: &BoundaryChecker) {
    println!("Element types (first match wins):\n");
    println!("{:<20} {:<10} Patterns", "Type", "Mode");
    println!("{}", "-".repeat(80));

    for element in checker.catalogue().types() {
        for (i, spec) in element.patterns().iter().enumerate() {
            let (name, mode) = if i == 0 {
                (element.name().to_string(), element.mode().to_string())
            } else {
                (String::new(), String::new())
            };
            let captures = if spec.capture_names().is_empty() {
                String::new()
            } else {
                format!("  [{}]", spec.capture_names().join(", "))
            };
            println!("{name:<20} {mode:<10} {}{captures}", spec.pattern());
        }
    }
}

fn print_rules(checker: &BoundaryChecker) {
    println!("Rules (first rule naming the source type decides):\n");
    for (index, rule) in checker.rules().rules().iter().enumerate() {
        println!("{}", rule_label(index, rule.name()));
        println!("  from:  {}", rule.from().join(", "));
        let allow: Vec<String> = rule.allow().iter().map(ToString::to_string).collect();
        if allow.is_empty() {
            println!("  allow: (nothing)");
        } else {
            println!("  allow: {}", allow.join(", "));
        }
        if let Some(message) = rule.message() {
            println!("  message: {message}");
        }
    }
    if checker.rules().is_empty() {
        println!("(no rules: every import is denied)");
    }
}
