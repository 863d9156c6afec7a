//! Boundary configuration driven by TOML.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! dto types
//!   ↓ validate + convert (all errors collected)
//! LoadedConfig { Catalogue, RuleSet, Settings, Policy }
//!   ↓
//! BoundaryChecker
//! ```

use std::path::Path;

use crate::catalogue::Catalogue;
use crate::pattern::PathPattern;
use crate::ruleset::RuleSet;
use crate::types::Severity;

pub mod dto;
pub mod loader;

pub use loader::LoadError;

/// Run settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Paths matching any of these are part of the catalogued tree,
    /// in addition to the supplied file list.
    pub include: Vec<PathPattern>,
    /// Evaluate edges in parallel.
    pub parallel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            parallel: true,
        }
    }
}

impl Settings {
    /// Tests whether a path is covered by an `include` glob.
    #[must_use]
    pub fn includes(&self, path: &str) -> bool {
        self.include.iter().any(|p| p.matches(path).is_some())
    }
}

/// Reporting level per policy. `None` means the policy is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Denied edges.
    pub element_types: Option<Severity>,
    /// Catalogued targets matching no element type.
    pub no_unknown: Option<Severity>,
    /// Unclassified files under a declared pattern root.
    pub no_unknown_files: Option<Severity>,
    /// Unclassified files outside every pattern root.
    pub no_unrooted_files: Option<Severity>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            element_types: Some(Severity::Error),
            no_unknown: Some(Severity::Error),
            no_unknown_files: Some(Severity::Error),
            no_unrooted_files: None,
        }
    }
}

/// Validated configuration, ready to build a checker.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Element types in priority order.
    pub catalogue: Catalogue,
    /// Allow rules in priority order.
    pub rules: RuleSet,
    /// Run settings.
    pub settings: Settings,
    /// Reporting levels.
    pub policy: Policy,
}

impl LoadedConfig {
    /// Loads from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses and validates a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is invalid or fails validation.
    pub fn parse(content: &str) -> Result<Self, LoadError> {
        load_from_toml(content)
    }
}

/// Parses TOML content into a validated configuration.
///
/// # Errors
///
/// Returns an error if TOML parsing or validation fails.
pub fn load_from_toml(content: &str) -> Result<LoadedConfig, LoadError> {
    let dto: dto::BoundaryConfigDto = toml::from_str(content)?;
    loader::load(dto)
}
