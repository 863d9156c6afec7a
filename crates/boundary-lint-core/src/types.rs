//! Core types for edges, verdicts and check results.

use serde::{Deserialize, Serialize};

/// Severity level for reported problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail the check.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A directed import relationship, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportEdge {
    /// Path of the importing file.
    pub source: String,
    /// Imported file path or package identifier.
    pub target: String,
}

impl ImportEdge {
    /// Creates a new edge.
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl std::fmt::Display for ImportEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Decision reached for a single edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// Some rule explicitly allows the edge.
    Allowed,
    /// No rule allows the edge.
    Denied,
    /// The source path is not part of the supplied file list.
    UnknownSource,
    /// The target lies in the catalogued tree but matches no element type.
    UnknownTarget,
}

impl Outcome {
    /// Returns true for every outcome except [`Outcome::Allowed`].
    #[must_use]
    pub fn is_problem(self) -> bool {
        !matches!(self, Self::Allowed)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allowed => write!(f, "allowed"),
            Self::Denied => write!(f, "denied"),
            Self::UnknownSource => write!(f, "unknown-source"),
            Self::UnknownTarget => write!(f, "unknown-target"),
        }
    }
}

/// Per-edge result of a boundary check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// The evaluated edge.
    pub edge: ImportEdge,
    /// What was decided.
    pub outcome: Outcome,
    /// Declaration index of the rule that produced the decision, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<usize>,
    /// Element type of the source (absent for unknown sources).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    /// Element type of the target (absent for unknown sources).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.edge, self.outcome)?;
        if let Some(rule) = self.matched_rule {
            write!(f, " (rules[{rule}])")?;
        }
        Ok(())
    }
}

/// Classification-time problem found for a supplied file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    /// Unclassified file under the root of some declared pattern.
    UnknownFile,
    /// Unclassified file outside every declared pattern root.
    UnrootedFile,
}

/// A file-level finding, reported separately from edge verdicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFinding {
    /// Path of the file.
    pub path: String,
    /// What is wrong with it.
    pub kind: FindingKind,
    /// Severity configured for this kind.
    pub severity: Severity,
}

/// A reportable problem, derived from verdicts and findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Code (e.g., "BND001").
    pub code: String,
    /// Policy name (e.g., "element-types").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// File the violation is attributed to.
    pub path: String,
    /// Import target, for edge violations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            path: path.into(),
            target: None,
            message: message.into(),
        }
    }

    /// Attaches the import target this violation refers to.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{} {} at {}\n", self.code, self.rule, self.path);
        if let Some(target) = &self.target {
            let _ = writeln!(output, "  --> imports {target}");
        }
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} [{}] {}", self.path, self.severity, self.code, self.message)
    }
}

/// Result of a boundary check run.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// One verdict per input edge, in input order.
    pub verdicts: Vec<Verdict>,
    /// File-level findings, sorted by path.
    pub findings: Vec<FileFinding>,
    /// Reportable problems at their configured severity.
    pub violations: Vec<Violation>,
    /// Number of distinct files classified.
    pub files_checked: usize,
}

impl CheckReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Counts verdicts with the given outcome.
    #[must_use]
    pub fn count_outcome(&self, outcome: Outcome) -> usize {
        self.verdicts.iter().filter(|v| v.outcome == outcome).count()
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.violations.iter().filter(|v| v.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Looks up the verdict for an edge.
    #[must_use]
    pub fn verdict_for(&self, source: &str, target: &str) -> Option<&Verdict> {
        self.verdicts
            .iter()
            .find(|v| v.edge.source == source && v.edge.target == target)
    }

    /// Formats violations as a test failure report.
    ///
    /// Produces a multi-line report suitable for `panic!()` messages
    /// when boundaries are checked from a `cargo test`.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<&Violation> = self
            .violations
            .iter()
            .filter(|v| v.severity >= fail_on)
            .collect();

        let mut report = String::new();
        let _ = writeln!(
            report,
            "\n=== boundary-lint: {} violation(s) ===\n",
            failing.len()
        );

        for v in &failing {
            let _ = write!(report, "{}", v.format());
            let _ = writeln!(report);
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Total: {} error(s), {} warning(s), {} info(s) in {} file(s)",
            errors, warnings, infos, self.files_checked
        );

        report
    }
}
