//! DTO → Domain model conversion with validation.
//!
//! Unlike a fail-fast conversion, every problem is collected so a large
//! catalogue can be fixed in one pass.

use miette::Diagnostic;
use std::path::PathBuf;

use crate::catalogue::{Catalogue, ElementType, PatternSpec};
use crate::error::ConfigError;
use crate::pattern::{MatchMode, PathPattern};
use crate::ruleset::{rule_label, CaptureConstraint, ConstraintValue, Rule, RuleSet, TargetSpec};
use crate::types::Severity;

use super::dto::{
    BoundaryConfigDto, ElementDto, PatternDto, PolicyDto, RuleDto, SettingsDto, TargetDto,
};
use super::{LoadedConfig, Policy, Settings};

/// Errors from reading, parsing and validating a configuration.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum LoadError {
    /// Failed to read the config file.
    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(boundary_lint::config::io))]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },

    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(boundary_lint::config::toml))]
    Toml(#[from] toml::de::Error),

    /// One or more validation errors.
    #[error("configuration has {} error(s):\n{}", .errors.len(), format_errors(.errors))]
    #[diagnostic(code(boundary_lint::config::invalid))]
    Invalid {
        /// Every problem found.
        #[related]
        errors: Vec<ConfigError>,
    },
}

impl LoadError {
    /// Returns the validation errors, if this is a validation failure.
    #[must_use]
    pub fn errors(&self) -> &[ConfigError] {
        match self {
            Self::Invalid { errors } => errors,
            _ => &[],
        }
    }
}

fn format_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts a `BoundaryConfigDto` to a validated [`LoadedConfig`].
///
/// # Errors
///
/// Returns [`LoadError::Invalid`] with every problem found.
pub fn load(dto: BoundaryConfigDto) -> Result<LoadedConfig, LoadError> {
    let mut errors = Vec::new();

    let settings = convert_settings(&dto.settings, &mut errors);
    let policy = convert_policy(&dto.policy, &mut errors);

    let types = dto
        .elements
        .iter()
        .enumerate()
        .filter_map(|(i, e)| convert_element(e, i, &mut errors))
        .collect();

    let rules: Vec<Rule> = dto
        .rules
        .into_iter()
        .enumerate()
        .map(|(i, r)| convert_rule(r, i, &mut errors))
        .collect();

    // Rules are checked against the first declaration of each type name,
    // so catalogue errors never hide rule errors.
    let (catalogue, catalogue_errors) = Catalogue::build(types);
    errors.extend(catalogue_errors);
    let ruleset = match RuleSet::new(rules, &catalogue) {
        Ok(ruleset) => Some((catalogue, ruleset)),
        Err(rule_errors) => {
            errors.extend(rule_errors);
            None
        }
    };

    match ruleset {
        Some((catalogue, rules)) if errors.is_empty() => {
            tracing::debug!(
                elements = catalogue.types().len(),
                rules = rules.len(),
                "configuration loaded"
            );
            Ok(LoadedConfig {
                catalogue,
                rules,
                settings,
                policy,
            })
        }
        _ => Err(LoadError::Invalid { errors }),
    }
}

fn convert_settings(dto: &SettingsDto, errors: &mut Vec<ConfigError>) -> Settings {
    let include = dto
        .include
        .iter()
        .enumerate()
        .filter_map(|(i, p)| match PathPattern::new(p, MatchMode::Full) {
            Ok(pattern) => Some(pattern),
            Err(source) => {
                errors.push(ConfigError::InvalidPattern {
                    context: format!("settings.include[{i}]"),
                    source,
                });
                None
            }
        })
        .collect();
    Settings {
        include,
        parallel: dto.parallel,
    }
}

fn convert_policy(dto: &PolicyDto, errors: &mut Vec<ConfigError>) -> Policy {
    let mut level = |key: &str, value: &str| {
        parse_level(value, key).unwrap_or_else(|e| {
            errors.push(e);
            None
        })
    };
    Policy {
        element_types: level("policy.element-types", &dto.element_types),
        no_unknown: level("policy.no-unknown", &dto.no_unknown),
        no_unknown_files: level("policy.no-unknown-files", &dto.no_unknown_files),
        no_unrooted_files: level("policy.no-unrooted-files", &dto.no_unrooted_files),
    }
}

fn convert_element(
    dto: &ElementDto,
    index: usize,
    errors: &mut Vec<ConfigError>,
) -> Option<ElementType> {
    if dto.name.is_empty() {
        errors.push(ConfigError::EmptyElementName { index });
        return None;
    }

    let Some(mode) = parse_mode(&dto.mode) else {
        errors.push(ConfigError::UnknownMode {
            element: dto.name.clone(),
            value: dto.mode.clone(),
        });
        // Patterns cannot be compiled without a mode; the name still resolves.
        return Some(ElementType::new(dto.name.clone(), MatchMode::default(), Vec::new()));
    };

    if dto.patterns.is_empty() {
        errors.push(ConfigError::ElementWithoutPatterns {
            name: dto.name.clone(),
        });
    }

    let mut patterns = Vec::with_capacity(dto.patterns.len());
    for (j, pattern_dto) in dto.patterns.iter().enumerate() {
        let (raw, capture) = match pattern_dto {
            PatternDto::Plain(raw) => (raw, &dto.capture),
            PatternDto::Detailed { pattern, capture } => {
                (pattern, capture.as_ref().unwrap_or(&dto.capture))
            }
        };

        let compiled = match PathPattern::new(raw, mode) {
            Ok(compiled) => compiled,
            Err(source) => {
                errors.push(ConfigError::InvalidPattern {
                    context: format!("element type `{}` patterns[{j}]", dto.name),
                    source,
                });
                continue;
            }
        };

        match PatternSpec::new(&dto.name, compiled, capture.clone()) {
            Ok(spec) => patterns.push(spec),
            Err(spec_errors) => errors.extend(spec_errors),
        }
    }

    // Kept even when some patterns failed, so rules referencing it still resolve.
    Some(ElementType::new(dto.name.clone(), mode, patterns))
}

fn convert_rule(dto: RuleDto, index: usize, errors: &mut Vec<ConfigError>) -> Rule {
    let label = rule_label(index, dto.name.as_deref());

    let allow = dto
        .allow
        .into_iter()
        .map(|target| match target {
            TargetDto::Bare(element) => TargetSpec::Bare(element),
            TargetDto::Constrained { element, captures } => {
                let constraints = captures
                    .into_iter()
                    .filter_map(|(capture, raw)| match ConstraintValue::parse(&raw, &label) {
                        Ok(value) => Some(CaptureConstraint::new(capture, value)),
                        Err(e) => {
                            errors.push(e);
                            None
                        }
                    })
                    .collect();
                TargetSpec::Constrained {
                    element,
                    constraints,
                }
            }
        })
        .collect();

    let mut rule = Rule::new(dto.from, allow);
    if let Some(name) = dto.name {
        rule = rule.with_name(name);
    }
    if let Some(message) = dto.message {
        rule = rule.with_message(message);
    }
    rule
}

fn parse_mode(value: &str) -> Option<MatchMode> {
    match value {
        "full" => Some(MatchMode::Full),
        "filename" => Some(MatchMode::Filename),
        _ => None,
    }
}

/// Parses a policy level; `off` disables the policy.
///
/// # Errors
///
/// Returns error for anything but `error`, `warning`, `info` and `off`.
pub fn parse_level(value: &str, context: &str) -> Result<Option<Severity>, ConfigError> {
    match value {
        "error" => Ok(Some(Severity::Error)),
        "warning" => Ok(Some(Severity::Warning)),
        "info" => Ok(Some(Severity::Info)),
        "off" => Ok(None),
        _ => Err(ConfigError::UnknownLevel {
            context: context.to_string(),
            value: value.to_string(),
        }),
    }
}
