//! Report rendering.

use anyhow::Result;
use boundary_lint_core::{CheckReport, Outcome, Severity};

use crate::OutputFormat;

/// Prints a check report in the specified format.
pub fn print(report: &CheckReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn print_text(report: &CheckReport) {
    let (errors, warnings, infos) = report.count_by_severity();

    for violation in &report.violations {
        println!("{} {} at {}", violation.code, violation.rule, violation.path);
        if let Some(target) = &violation.target {
            println!("  --> imports {target}");
        }
        println!("  {}: {}", severity_label(violation.severity), violation.message);
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, report.files_checked
    );
    println!(
        "Checked {} import(s): {} allowed, {} denied, {} unknown target(s), {} unknown source(s)",
        report.verdicts.len(),
        report.count_outcome(Outcome::Allowed),
        report.count_outcome(Outcome::Denied),
        report.count_outcome(Outcome::UnknownTarget),
        report.count_outcome(Outcome::UnknownSource),
    );
}

fn print_json(report: &CheckReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &CheckReport) {
    for violation in &report.violations {
        println!("{violation}");
    }
}
