//! Import graph manifest and file discovery.
//!
//! ```json
//! {
//!   "files": ["src/lib/db.ts", "src/features/auth/login.ts"],
//!   "edges": [{ "source": "src/features/auth/login.ts", "target": "src/lib/db.ts" }]
//! }
//! ```
//!
//! `files` may be omitted, in which case the files are discovered under the
//! project root.

use anyhow::{Context, Result};
use boundary_lint_core::ImportEdge;
use serde::Deserialize;
use std::path::Path;

/// Files and import edges produced by an external extractor.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    /// Catalogued files, relative to the project root.
    #[serde(default)]
    pub files: Option<Vec<String>>,
    /// Import edges.
    #[serde(default)]
    pub edges: Vec<ImportEdge>,
}

impl Manifest {
    /// Reads a manifest from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    /// Parses manifest JSON.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Lists files under `root`, honouring `.gitignore`, as sorted relative paths.
pub fn discover_files(root: &Path) -> Result<Vec<String>> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder.git_ignore(true).require_git(false);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        files.push(rel.to_string_lossy().replace('\\', "/"));
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parse_with_files_and_edges() {
        let manifest = Manifest::parse(
            r#"{
                "files": ["src/lib/db.ts"],
                "edges": [{ "source": "src/lib/db.ts", "target": "pg" }]
            }"#,
        )
        .unwrap();
        assert_eq!(manifest.files.as_deref(), Some(&["src/lib/db.ts".to_string()][..]));
        assert_eq!(manifest.edges, vec![ImportEdge::new("src/lib/db.ts", "pg")]);
    }

    #[test]
    fn files_are_optional() {
        let manifest = Manifest::parse(r#"{ "edges": [] }"#).unwrap();
        assert!(manifest.files.is_none());
    }

    #[test]
    fn malformed_edge_is_rejected() {
        assert!(Manifest::parse(r#"{ "edges": [{ "source": "a" }] }"#).is_err());
    }

    #[test]
    fn missing_file_mentions_path() {
        let err = Manifest::from_file(Path::new("/nonexistent/manifest.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/manifest.json"));
    }

    #[test]
    fn discovery_honours_gitignore() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("src/features/auth")).unwrap();
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::write(root.join("src/lib.ts"), "").unwrap();
        fs::write(root.join("src/features/auth/login.ts"), "").unwrap();
        fs::write(root.join("dist/bundle.js"), "").unwrap();
        fs::write(root.join(".gitignore"), "dist/\n").unwrap();

        let files = discover_files(root).unwrap();
        assert_eq!(files, vec!["src/features/auth/login.ts", "src/lib.ts"]);
    }
}
