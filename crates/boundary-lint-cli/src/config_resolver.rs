//! Locates the boundary configuration file.
//!
//! Priority order:
//!
//! 1. `--config` flag
//! 2. `{root}/boundary-lint.toml` or `{root}/.boundary-lint.toml`
//! 3. `$BOUNDARY_LINT_CONFIG_DIR/config.toml` or `~/.boundary-lint/config.toml`
//!
//! There is no built-in catalogue, so finding nothing is an error for
//! every command that needs one.

use std::fmt;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project root.
    Project(PathBuf),
    /// Found in the user-wide config directory.
    Global(PathBuf),
    /// Nothing found.
    NotFound,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::NotFound => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "{}", p.display()),
            Self::Project(p) => write!(f, "{} (project)", p.display()),
            Self::Global(p) => write!(f, "{} (global)", p.display()),
            Self::NotFound => write!(f, "no configuration"),
        }
    }
}

/// Project-level config file names, checked in order.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["boundary-lint.toml", ".boundary-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

const CONFIG_DIR_ENV: &str = "BOUNDARY_LINT_CONFIG_DIR";

/// Resolves the configuration file for a project root.
#[must_use]
pub fn resolve(root: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(root, explicit, global_config_dir())
}

/// Takes the global directory as a parameter so tests avoid env var races.
fn resolve_inner(root: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    // An explicit path is trusted as-is; loading reports a missing file.
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(candidate) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|c| c.is_file())
    {
        tracing::debug!(path = %candidate.display(), "found project config");
        return ConfigSource::Project(candidate);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_CONFIG_NAME)) {
        Some(candidate) if candidate.is_file() => {
            tracing::debug!(path = %candidate.display(), "found global config");
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::NotFound,
    }
}

/// `$BOUNDARY_LINT_CONFIG_DIR`, else `~/.boundary-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".boundary-lint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_wins_over_project_config() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("custom.toml");
        fs::write(&explicit, "").unwrap();
        fs::write(tmp.path().join("boundary-lint.toml"), "").unwrap();

        let result = resolve_inner(tmp.path(), Some(&explicit), None);
        assert_eq!(result, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn explicit_path_is_not_checked() {
        let result = resolve_inner(Path::new("/tmp"), Some(Path::new("/nonexistent.toml")), None);
        assert_eq!(result.path(), Some(Path::new("/nonexistent.toml")));
    }

    #[test]
    fn plain_name_preferred_over_dot_prefix() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".boundary-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_inner(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join(".boundary-lint.toml"))
        );

        fs::write(tmp.path().join("boundary-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_inner(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join("boundary-lint.toml"))
        );
    }

    #[test]
    fn directory_named_like_config_is_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("boundary-lint.toml")).unwrap();
        assert_eq!(resolve_inner(tmp.path(), None, None), ConfigSource::NotFound);
    }

    #[test]
    fn global_used_only_without_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Global(global.path().join("config.toml")));

        fs::write(project.path().join("boundary-lint.toml"), "").unwrap();
        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert!(matches!(result, ConfigSource::Project(_)));
    }

    #[test]
    fn empty_global_dir_is_not_found() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::NotFound);
        assert!(result.path().is_none());
    }

    #[test]
    fn display_names_the_origin() {
        let p = PathBuf::from("cfg.toml");
        assert_eq!(ConfigSource::Project(p.clone()).to_string(), "cfg.toml (project)");
        assert_eq!(ConfigSource::Global(p).to_string(), "cfg.toml (global)");
        assert_eq!(ConfigSource::NotFound.to_string(), "no configuration");
    }
}
