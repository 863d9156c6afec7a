//! Check command implementation.

use anyhow::Result;
use boundary_lint_core::{BoundaryChecker, CheckReport, Severity};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::manifest::{discover_files, Manifest};
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    manifest_path: &Path,
    root: &Path,
    format: OutputFormat,
    fail_on: Severity,
    source: &ConfigSource,
) -> Result<()> {
    let checker = super::load_checker(source);
    let manifest = Manifest::from_file(manifest_path)?;

    let report = check_manifest(&checker, manifest, root)?;
    super::output::print(&report, format)?;

    if report.has_violations_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

/// Checks a manifest, discovering files under `root` when it lists none.
fn check_manifest(checker: &BoundaryChecker, manifest: Manifest, root: &Path) -> Result<CheckReport> {
    let files = match manifest.files {
        Some(files) => files,
        None => {
            let settings = checker.settings();
            let mut files = discover_files(root)?;
            if !settings.include.is_empty() {
                files.retain(|f| settings.includes(f));
            }
            tracing::info!("Discovered {} files under {}", files.len(), root.display());
            files
        }
    };

    Ok(checker.check(&files, &manifest.edges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use boundary_lint_core::Outcome;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
[settings]
include = ["src/**"]

[[elements]]
type = "shared"
patterns = ["src/lib/**"]

[[elements]]
type = "feature"
capture = ["featureName"]
patterns = ["src/features/*/**"]

[[rules]]
from = ["feature"]
allow = ["shared", { type = "feature", captures = { featureName = "${from.featureName}" } }]
"#;

    fn project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        for file in [
            "src/lib/db.ts",
            "src/features/auth/login.ts",
            "src/features/billing/plan.ts",
            "scripts/seed.ts",
        ] {
            let path = tmp.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        tmp
    }

    #[test]
    fn discovered_files_are_limited_to_include() {
        let tmp = project();
        let checker = BoundaryChecker::from_toml(CONFIG).unwrap();
        let manifest = Manifest::parse(
            r#"{ "edges": [
                { "source": "src/features/auth/login.ts", "target": "src/lib/db.ts" },
                { "source": "src/features/auth/login.ts", "target": "src/features/billing/plan.ts" },
                { "source": "scripts/seed.ts", "target": "src/lib/db.ts" }
            ] }"#,
        )
        .unwrap();

        let report = check_manifest(&checker, manifest, tmp.path()).unwrap();
        assert_eq!(report.files_checked, 3);
        let outcomes: Vec<Outcome> = report.verdicts.iter().map(|v| v.outcome).collect();
        assert_eq!(
            outcomes,
            vec![Outcome::Allowed, Outcome::Denied, Outcome::UnknownSource]
        );
    }

    #[test]
    fn listed_files_skip_discovery() {
        let tmp = project();
        let checker = BoundaryChecker::from_toml(CONFIG).unwrap();
        let manifest = Manifest::parse(
            r#"{
                "files": ["src/lib/db.ts"],
                "edges": [{ "source": "src/features/auth/login.ts", "target": "src/lib/db.ts" }]
            }"#,
        )
        .unwrap();

        let report = check_manifest(&checker, manifest, tmp.path()).unwrap();
        assert_eq!(report.files_checked, 1);
        assert_eq!(report.verdicts[0].outcome, Outcome::UnknownSource);
    }
}
