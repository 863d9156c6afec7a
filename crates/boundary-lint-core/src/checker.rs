//! Boundary checker: classifies files once, then evaluates every edge.

use std::borrow::Cow;
use std::collections::HashMap;

use rayon::prelude::*;

use crate::catalogue::{Catalogue, ClassifiedElement, UNCLASSIFIED_TYPE};
use crate::config::{LoadError, LoadedConfig, Policy, Settings};
use crate::pattern::normalize_path;
use crate::ruleset::{rule_label, RuleId, RuleSet};
use crate::types::{
    CheckReport, FileFinding, FindingKind, ImportEdge, Outcome, Severity, Verdict, Violation,
};

/// Classification memo, keyed by normalised path.
type Classified = HashMap<String, ClassifiedElement>;

/// Checks import edges against a validated configuration.
#[derive(Debug, Clone)]
pub struct BoundaryChecker {
    config: LoadedConfig,
}

impl BoundaryChecker {
    /// Creates a checker from a loaded configuration.
    #[must_use]
    pub fn new(config: LoadedConfig) -> Self {
        Self { config }
    }

    /// Creates a checker from TOML configuration text.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration fails to parse or validate.
    pub fn from_toml(content: &str) -> Result<Self, LoadError> {
        LoadedConfig::parse(content).map(Self::new)
    }

    /// Returns the element type catalogue.
    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.config.catalogue
    }

    /// Returns the rule set.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.config.rules
    }

    /// Returns the reporting policy.
    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.config.policy
    }

    /// Returns the run settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.config.settings
    }

    /// Resolves an import target that is not part of the supplied files.
    ///
    /// Targets under an `include` glob are classified like files; anything
    /// else is an external element carrying the raw identifier.
    #[must_use]
    pub fn resolve_target(&self, target: &str) -> ClassifiedElement {
        let path = normalize_path(target);
        if self.settings().includes(&path) {
            self.catalogue().classify(&path)
        } else {
            ClassifiedElement::external(target)
        }
    }

    /// Checks every edge, returning one verdict per edge in input order.
    ///
    /// `files` is the catalogued file set. Edges whose source is missing
    /// from it are reported as [`Outcome::UnknownSource`].
    #[must_use]
    pub fn check(&self, files: &[String], edges: &[ImportEdge]) -> CheckReport {
        let classified: Classified = files
            .iter()
            .map(|f| {
                let element = self.catalogue().classify(f);
                (element.path().to_string(), element)
            })
            .collect();

        let mut targets: HashMap<&str, ClassifiedElement> = HashMap::new();
        for edge in edges {
            let target = edge.target.as_str();
            if !targets.contains_key(target) && !classified.contains_key(&normalize_path(target)) {
                targets.insert(target, self.resolve_target(target));
            }
        }

        let findings = self.file_findings(&classified);

        let verdicts: Vec<Verdict> = if self.settings().parallel {
            edges
                .par_iter()
                .map(|edge| self.evaluate_edge(edge, &classified, &targets))
                .collect()
        } else {
            edges
                .iter()
                .map(|edge| self.evaluate_edge(edge, &classified, &targets))
                .collect()
        };

        let mut violations: Vec<Violation> =
            findings.iter().map(finding_violation).collect();
        violations.extend(verdicts.iter().filter_map(|v| self.verdict_violation(v)));

        let report = CheckReport {
            verdicts,
            findings,
            violations,
            files_checked: classified.len(),
        };

        tracing::debug!(
            files = report.files_checked,
            edges = report.verdicts.len(),
            allowed = report.count_outcome(Outcome::Allowed),
            denied = report.count_outcome(Outcome::Denied),
            findings = report.findings.len(),
            "boundary check complete"
        );

        report
    }

    fn file_findings(&self, classified: &Classified) -> Vec<FileFinding> {
        let policy = self.policy();
        let mut findings: Vec<FileFinding> = classified
            .values()
            .filter(|el| el.is_unclassified())
            .filter_map(|el| {
                let (kind, level) = if self.catalogue().is_rooted(el.path()) {
                    (FindingKind::UnknownFile, policy.no_unknown_files)
                } else {
                    (FindingKind::UnrootedFile, policy.no_unrooted_files)
                };
                level.map(|severity| FileFinding {
                    path: el.path().to_string(),
                    kind,
                    severity,
                })
            })
            .collect();
        findings.sort_by(|a, b| a.path.cmp(&b.path));
        findings
    }

    fn evaluate_edge(
        &self,
        edge: &ImportEdge,
        classified: &Classified,
        targets: &HashMap<&str, ClassifiedElement>,
    ) -> Verdict {
        let Some(source) = classified.get(&normalize_path(&edge.source)) else {
            return Verdict {
                edge: edge.clone(),
                outcome: Outcome::UnknownSource,
                matched_rule: None,
                source_type: None,
                target_type: None,
            };
        };

        let target = match classified.get(&normalize_path(&edge.target)) {
            Some(el) => Cow::Borrowed(el),
            None => targets
                .get(edge.target.as_str())
                .map_or_else(|| Cow::Owned(self.resolve_target(&edge.target)), Cow::Borrowed),
        };

        let catalogue = self.catalogue();
        let source_type = Some(catalogue.type_name(source.kind()).to_string());
        let target_type = Some(catalogue.type_name(target.kind()).to_string());

        if target.is_unclassified() && self.policy().no_unknown.is_some() {
            return Verdict {
                edge: edge.clone(),
                outcome: Outcome::UnknownTarget,
                matched_rule: None,
                source_type,
                target_type,
            };
        }

        let evaluation = self.rules().evaluate(source, &target, catalogue);
        Verdict {
            edge: edge.clone(),
            outcome: evaluation.outcome,
            matched_rule: evaluation.matched_rule.map(RuleId::index),
            source_type,
            target_type,
        }
    }

    fn verdict_violation(&self, verdict: &Verdict) -> Option<Violation> {
        let edge = &verdict.edge;
        let source_type = verdict.source_type.as_deref().unwrap_or(UNCLASSIFIED_TYPE);
        let target_type = verdict.target_type.as_deref().unwrap_or(UNCLASSIFIED_TYPE);

        let (code, rule, severity, message) = match verdict.outcome {
            Outcome::Allowed => return None,
            Outcome::Denied => {
                let severity = self.policy().element_types?;
                (
                    "BND001",
                    "element-types",
                    severity,
                    self.denial_message(verdict.matched_rule, source_type, target_type),
                )
            }
            Outcome::UnknownTarget => {
                let severity = self.policy().no_unknown?;
                (
                    "BND002",
                    "no-unknown",
                    severity,
                    format!("`{}` matches no element type", edge.target),
                )
            }
            Outcome::UnknownSource => (
                "BND003",
                "unknown-source",
                Severity::Error,
                format!("`{}` is not in the supplied file list", edge.source),
            ),
        };

        Some(Violation::new(code, rule, severity, &edge.source, message).with_target(&edge.target))
    }

    fn denial_message(&self, matched_rule: Option<usize>, source: &str, target: &str) -> String {
        let Some(index) = matched_rule else {
            return format!("no rule allows imports from `{source}` elements");
        };
        let rule = self.rules().rules().get(index);
        if let Some(message) = rule.and_then(|r| r.message()) {
            return message.to_string();
        }
        format!(
            "`{source}` may not import `{target}` ({})",
            rule_label(index, rule.and_then(|r| r.name()))
        )
    }
}

fn finding_violation(finding: &FileFinding) -> Violation {
    let (code, rule, message) = match finding.kind {
        FindingKind::UnknownFile => (
            "BND004",
            "no-unknown-files",
            "file matches no element type",
        ),
        FindingKind::UnrootedFile => (
            "BND005",
            "no-unrooted-files",
            "file lies outside every element pattern root",
        ),
    };
    Violation::new(code, rule, finding.severity, &finding.path, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[settings]
include = ["src/**"]

[[elements]]
type = "shared"
patterns = ["src/components/**", "src/lib/**"]

[[elements]]
type = "feature"
capture = ["featureName"]
patterns = ["src/features/*/**"]

[[elements]]
type = "app"
capture = ["_", "fileName"]
patterns = ["src/app/*/*"]

[[elements]]
type = "stylesheet"
mode = "filename"
patterns = ["*.css"]

[[rules]]
from = ["shared"]
allow = ["shared", "external"]

[[rules]]
name = "feature-isolation"
from = ["feature"]
allow = ["shared", "external", { type = "feature", captures = { featureName = "${from.featureName}" } }]

[[rules]]
from = ["app"]
allow = ["shared", "feature", "external", { type = "app", captures = { fileName = "*.css" } }]
message = "app files may only import shared code, features and stylesheets"
"#;

    fn checker() -> BoundaryChecker {
        BoundaryChecker::from_toml(CONFIG).unwrap()
    }

    fn checker_with(extra: &str) -> BoundaryChecker {
        BoundaryChecker::from_toml(&format!("{CONFIG}\n{extra}")).unwrap()
    }

    fn files() -> Vec<String> {
        [
            "src/components/button.tsx",
            "src/lib/db.ts",
            "src/features/auth/login.ts",
            "src/features/auth/session.ts",
            "src/features/billing/plan.ts",
            "src/app/home/page.tsx",
            "src/app/home/page.css",
            "src/app/about/page.tsx",
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
    }

    fn edge(source: &str, target: &str) -> ImportEdge {
        ImportEdge::new(source, target)
    }

    fn outcome(checker: &BoundaryChecker, files: &[String], source: &str, target: &str) -> Outcome {
        checker.check(files, &[edge(source, target)]).verdicts[0].outcome
    }

    #[test]
    fn shared_feature_scenario() {
        let checker = checker();
        let files = files();
        let edges = vec![
            edge("src/features/auth/login.ts", "src/lib/db.ts"),
            edge("src/features/auth/login.ts", "src/features/billing/plan.ts"),
            edge("src/lib/db.ts", "src/features/auth/login.ts"),
        ];
        let report = checker.check(&files, &edges);
        let outcomes: Vec<Outcome> = report.verdicts.iter().map(|v| v.outcome).collect();
        assert_eq!(
            outcomes,
            vec![Outcome::Allowed, Outcome::Denied, Outcome::Denied]
        );
        assert_eq!(report.verdicts[1].matched_rule, Some(1));
        assert_eq!(report.verdicts[2].matched_rule, Some(0));
        assert_eq!(report.violations.len(), 2);
        assert!(report.has_errors());
    }

    #[test]
    fn self_feature_imports_are_allowed() {
        let checker = checker();
        let files = files();
        assert_eq!(
            outcome(&checker, &files, "src/features/auth/login.ts", "src/features/auth/session.ts"),
            Outcome::Allowed
        );
    }

    #[test]
    fn closed_world_without_rule() {
        let checker = BoundaryChecker::from_toml(
            r#"
[[elements]]
type = "shared"
patterns = ["src/lib/**"]
"#,
        )
        .unwrap();
        let files = vec!["src/lib/a.ts".to_string(), "src/lib/b.ts".to_string()];
        let report = checker.check(&files, &[edge("src/lib/a.ts", "src/lib/b.ts")]);
        assert_eq!(report.verdicts[0].outcome, Outcome::Denied);
        assert_eq!(report.verdicts[0].matched_rule, None);
        assert!(report.violations[0]
            .message
            .contains("no rule allows imports from `shared`"));
    }

    #[test]
    fn earlier_type_takes_priority() {
        let checker = checker_with(
            r#"
[[elements]]
type = "everything"
patterns = ["src/**"]
"#,
        );
        let report = checker.check(&files(), &[]);
        assert!(report.findings.is_empty());
        let el = checker.catalogue().classify("src/lib/db.ts");
        assert_eq!(checker.catalogue().type_name(el.kind()), "shared");
    }

    #[test]
    fn filename_mode_ignores_directory() {
        let checker = checker();
        let files = vec![
            "src/app/home/page.tsx".to_string(),
            "src/styles/theme.css".to_string(),
            "vendor/deep/nested/reset.css".to_string(),
        ];
        let report = checker.check(&files, &[]);
        assert!(report.findings.is_empty());
        for path in &files[1..] {
            let el = checker.catalogue().classify(path);
            assert_eq!(checker.catalogue().type_name(el.kind()), "stylesheet");
        }
    }

    #[test]
    fn app_may_import_css_by_filename_capture() {
        let checker = checker();
        let files = files();
        assert_eq!(
            outcome(&checker, &files, "src/app/home/page.tsx", "src/app/home/page.css"),
            Outcome::Allowed
        );
        assert_eq!(
            outcome(&checker, &files, "src/app/home/page.tsx", "src/app/about/page.tsx"),
            Outcome::Denied
        );
        let report = checker.check(&files, &[edge("src/app/home/page.tsx", "src/app/about/page.tsx")]);
        assert_eq!(
            report.violations[0].message,
            "app files may only import shared code, features and stylesheets"
        );
    }

    #[test]
    fn unclassified_files_are_findings() {
        let checker = checker();
        let mut files = files();
        files.push("src/app/layout.tsx".to_string());
        files.push("scripts/seed.ts".to_string());
        let report = checker.check(&files, &[]);

        // scripts/ is outside every pattern root and that policy is off.
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].path, "src/app/layout.tsx");
        assert_eq!(report.findings[0].kind, FindingKind::UnknownFile);
        assert!(report.verdicts.is_empty());
        assert_eq!(report.violations[0].code, "BND004");
    }

    #[test]
    fn unrooted_files_reported_when_enabled() {
        let checker = checker_with(
            r#"
[policy]
no-unrooted-files = "warning"
"#,
        );
        let mut files = files();
        files.push("scripts/seed.ts".to_string());
        let report = checker.check(&files, &[]);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind, FindingKind::UnrootedFile);
        assert_eq!(report.findings[0].severity, Severity::Warning);
        assert!(!report.has_errors());
        assert!(report.has_violations_at(Severity::Warning));
    }

    #[test]
    fn unclassified_target_is_unknown_in_strict_mode() {
        let checker = checker();
        let files = files();
        let report = checker.check(
            &files,
            &[edge("src/lib/db.ts", "src/tasks/cron.ts")],
        );
        let verdict = &report.verdicts[0];
        assert_eq!(verdict.outcome, Outcome::UnknownTarget);
        assert_eq!(verdict.target_type.as_deref(), Some(UNCLASSIFIED_TYPE));
        assert_eq!(report.violations[0].code, "BND002");
    }

    #[test]
    fn unclassified_target_is_evaluated_when_lenient() {
        let lenient = checker_with(
            r#"
[policy]
no-unknown = "off"
"#,
        );
        let files = files();
        let report = lenient.check(&files, &[edge("src/lib/db.ts", "src/tasks/cron.ts")]);
        assert_eq!(report.verdicts[0].outcome, Outcome::Denied);
        assert_eq!(report.verdicts[0].matched_rule, Some(0));
    }

    #[test]
    fn unknown_source_is_never_dropped() {
        let checker = checker();
        let report = checker.check(&files(), &[edge("src/missing.ts", "src/lib/db.ts")]);
        let verdict = &report.verdicts[0];
        assert_eq!(verdict.outcome, Outcome::UnknownSource);
        assert_eq!(verdict.source_type, None);
        assert_eq!(report.violations[0].code, "BND003");
        assert_eq!(report.violations[0].severity, Severity::Error);
    }

    #[test]
    fn targets_outside_include_are_external() {
        let checker = checker();
        let files = files();
        let report = checker.check(
            &files,
            &[
                edge("src/lib/db.ts", "drizzle-orm"),
                edge("src/features/auth/login.ts", "@auth/core/jwt"),
            ],
        );
        for verdict in &report.verdicts {
            assert_eq!(verdict.outcome, Outcome::Allowed, "{verdict}");
            assert_eq!(verdict.target_type.as_deref(), Some("external"));
        }
    }

    #[test]
    fn paths_are_normalized_before_lookup() {
        let checker = checker();
        let files = vec![
            "./src/lib/db.ts".to_string(),
            "src\\components\\button.tsx".to_string(),
        ];
        let report = checker.check(&files, &[edge("src/lib/db.ts", "./src/components/button.tsx")]);
        assert_eq!(report.files_checked, 2);
        assert_eq!(report.verdicts[0].outcome, Outcome::Allowed);
    }

    #[test]
    fn results_are_deterministic_under_shuffling() {
        let checker = checker();
        let files = files();
        let edges = vec![
            edge("src/features/auth/login.ts", "src/lib/db.ts"),
            edge("src/features/auth/login.ts", "src/features/billing/plan.ts"),
            edge("src/app/home/page.tsx", "src/app/home/page.css"),
            edge("src/lib/db.ts", "pg"),
            edge("src/nowhere.ts", "src/lib/db.ts"),
        ];
        let report = checker.check(&files, &edges);

        let mut reversed_files = files.clone();
        reversed_files.reverse();
        let mut reversed_edges = edges.clone();
        reversed_edges.reverse();
        let shuffled = checker.check(&reversed_files, &reversed_edges);

        for verdict in &report.verdicts {
            let other = shuffled
                .verdict_for(&verdict.edge.source, &verdict.edge.target)
                .unwrap();
            assert_eq!(verdict, other);
        }
        assert_eq!(report.findings, shuffled.findings);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let parallel = checker();
        let mut sequential = checker();
        sequential.config.settings.parallel = false;

        let files = files();
        let edges: Vec<ImportEdge> = files
            .iter()
            .flat_map(|s| files.iter().map(move |t| edge(s, t)))
            .collect();

        let a = parallel.check(&files, &edges);
        let b = sequential.check(&files, &edges);
        assert_eq!(a.verdicts, b.verdicts);
        assert_eq!(a.violations, b.violations);
    }

    #[test]
    fn element_types_off_suppresses_denials() {
        let checker = checker_with(
            r#"
[policy]
element-types = "off"
"#,
        );
        let files = files();
        let report = checker.check(
            &files,
            &[edge("src/features/auth/login.ts", "src/features/billing/plan.ts")],
        );
        assert_eq!(report.verdicts[0].outcome, Outcome::Denied);
        assert!(report.violations.is_empty());
    }
}
