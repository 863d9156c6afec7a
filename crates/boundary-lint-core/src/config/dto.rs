//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Raw TOML representation of a boundary configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoundaryConfigDto {
    /// Run settings.
    #[serde(default)]
    pub settings: SettingsDto,

    /// Reporting levels per policy.
    #[serde(default)]
    pub policy: PolicyDto,

    /// Element type catalogue, in priority order.
    #[serde(rename = "elements", default)]
    pub elements: Vec<ElementDto>,

    /// Allow rules, in priority order.
    #[serde(default)]
    pub rules: Vec<RuleDto>,
}

/// `[settings]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsDto {
    /// Globs describing the catalogued tree, beyond the supplied files.
    #[serde(default)]
    pub include: Vec<String>,

    /// Evaluate edges on the rayon thread pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for SettingsDto {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            parallel: true,
        }
    }
}

/// `[policy]` section. Each value is `error`, `warning`, `info` or `off`.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyDto {
    /// Level for denied edges.
    #[serde(rename = "element-types", default = "default_error")]
    pub element_types: String,

    /// Level for catalogued targets that match no element type.
    #[serde(rename = "no-unknown", default = "default_error")]
    pub no_unknown: String,

    /// Level for unclassified files under a declared pattern root.
    #[serde(rename = "no-unknown-files", default = "default_error")]
    pub no_unknown_files: String,

    /// Level for unclassified files outside every pattern root.
    #[serde(rename = "no-unrooted-files", default = "default_off")]
    pub no_unrooted_files: String,
}

impl Default for PolicyDto {
    fn default() -> Self {
        Self {
            element_types: default_error(),
            no_unknown: default_error(),
            no_unknown_files: default_error(),
            no_unrooted_files: default_off(),
        }
    }
}

/// TOML representation of an element type.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementDto {
    /// Element type name.
    #[serde(rename = "type")]
    pub name: String,

    /// `full` (default) or `filename`.
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Capture names applied to every pattern without its own list.
    #[serde(default)]
    pub capture: Vec<String>,

    /// Patterns in priority order.
    pub patterns: Vec<PatternDto>,
}

/// A pattern, optionally with its own capture names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PatternDto {
    /// `"src/lib/**"`
    Plain(String),
    /// `{ pattern = "src/app/*/*", capture = ["_", "fileName"] }`
    Detailed {
        /// The pattern.
        pattern: String,
        /// Capture names overriding the element-level list.
        #[serde(default)]
        capture: Option<Vec<String>>,
    },
}

/// TOML representation of an allow rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDto {
    /// Optional rule name, used in diagnostics.
    #[serde(default)]
    pub name: Option<String>,
    /// Source element types.
    pub from: Vec<String>,
    /// Allowed targets.
    #[serde(default)]
    pub allow: Vec<TargetDto>,
    /// Message reported when this rule denies an edge.
    #[serde(default)]
    pub message: Option<String>,
}

/// An entry of a rule's `allow` list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TargetDto {
    /// `"shared"`
    Bare(String),
    /// `{ type = "feature", captures = { featureName = "${from.featureName}" } }`
    Constrained {
        /// Target element type.
        #[serde(rename = "type")]
        element: String,
        /// Capture name → literal, glob, or `${from.<capture>}`.
        #[serde(default)]
        captures: BTreeMap<String, String>,
    },
}

fn default_true() -> bool {
    true
}

fn default_mode() -> String {
    "full".to_string()
}

fn default_error() -> String {
    "error".to_string()
}

fn default_off() -> String {
    "off".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_empty() {
        let dto: BoundaryConfigDto = toml::from_str("").unwrap();
        assert!(dto.elements.is_empty());
        assert!(dto.rules.is_empty());
        assert!(dto.settings.parallel);
        assert_eq!(dto.policy.element_types, "error");
        assert_eq!(dto.policy.no_unrooted_files, "off");
    }

    #[test]
    fn deserialize_mixed_patterns_and_targets() {
        let toml_str = r#"
[settings]
include = ["src/**"]
parallel = false

[policy]
no-unknown = "warning"

[[elements]]
type = "feature"
capture = ["featureName"]
patterns = ["src/features/*/**"]

[[elements]]
type = "app"
patterns = [{ pattern = "src/app/*/*", capture = ["_", "fileName"] }, "src/app/*"]

[[rules]]
from = ["feature"]
allow = ["shared", { type = "feature", captures = { featureName = "${from.featureName}" } }]
message = "features are isolated"
"#;
        let dto: BoundaryConfigDto = toml::from_str(toml_str).unwrap();
        assert_eq!(dto.settings.include, vec!["src/**".to_string()]);
        assert!(!dto.settings.parallel);
        assert_eq!(dto.policy.no_unknown, "warning");
        assert_eq!(dto.policy.no_unknown_files, "error");

        assert_eq!(dto.elements.len(), 2);
        assert_eq!(dto.elements[0].mode, "full");
        assert!(matches!(
            &dto.elements[1].patterns[0],
            PatternDto::Detailed { capture: Some(c), .. } if c.len() == 2
        ));
        assert!(matches!(&dto.elements[1].patterns[1], PatternDto::Plain(p) if p == "src/app/*"));

        let rule = &dto.rules[0];
        assert!(matches!(&rule.allow[0], TargetDto::Bare(t) if t == "shared"));
        assert!(matches!(
            &rule.allow[1],
            TargetDto::Constrained { element, captures }
                if element == "feature" && captures["featureName"] == "${from.featureName}"
        ));
    }
}
