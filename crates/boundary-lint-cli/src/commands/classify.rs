//! Classify command implementation.

use anyhow::Result;
use boundary_lint_core::BoundaryChecker;
use std::fmt::Write;

use crate::config_resolver::ConfigSource;

/// Runs the classify command.
pub fn run(paths: &[String], source: &ConfigSource) -> Result<()> {
    let checker = super::load_checker(source);
    for path in paths {
        println!("{}", describe(&checker, path));
    }
    Ok(())
}

/// One line per path: `path  type  {captures}`.
fn describe(checker: &BoundaryChecker, path: &str) -> String {
    let catalogue = checker.catalogue();
    let element = checker.resolve_target(path);
    let element = if element.kind() == boundary_lint_core::ElementKind::External
        && checker.settings().include.is_empty()
    {
        catalogue.classify(path)
    } else {
        element
    };

    let mut line = format!("{:<50} {}", element.path(), catalogue.type_name(element.kind()));
    if !element.captures().is_empty() {
        let _ = write!(line, " {{{}}}", element.captures());
    }
    if element.is_unclassified() && !catalogue.is_rooted(element.path()) {
        line.push_str(" (outside every pattern root)");
    }
    line
}
