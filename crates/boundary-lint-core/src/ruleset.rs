//! Allow rules and their evaluation.
//!
//! The policy is closed-world: an edge passes only when the first rule whose
//! `from` set names the source type lists a matching target. Capture
//! references (`${from.name}`) are kept as [`ConstraintValue::SourceCapture`]
//! and resolved per edge against the source element.

use std::collections::HashSet;

use crate::catalogue::{Catalogue, ClassifiedElement, ANONYMOUS_CAPTURE};
use crate::error::ConfigError;
use crate::pattern::SegmentPattern;
use crate::types::Outcome;

/// Index of a rule in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(usize);

impl RuleId {
    /// Declaration index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Right-hand side of a capture constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintValue {
    /// Fixed value or single-segment glob, compared with the target capture.
    Literal(SegmentPattern),
    /// Must equal the source element's capture of this name.
    SourceCapture(String),
}

impl ConstraintValue {
    /// Parses `"${from.name}"` into a source reference, anything else into a literal.
    ///
    /// # Errors
    ///
    /// Returns error for malformed `${...}` references and invalid globs.
    pub fn parse(raw: &str, rule: &str) -> Result<Self, ConfigError> {
        if let Some(inner) = raw.strip_prefix("${").and_then(|r| r.strip_suffix('}')) {
            return match inner.strip_prefix("from.") {
                Some(ANONYMOUS_CAPTURE) => Err(ConfigError::AnonymousCaptureReference {
                    rule: rule.to_string(),
                }),
                Some(name) if is_capture_name(name) => Ok(Self::SourceCapture(name.to_string())),
                _ => Err(ConfigError::InvalidCaptureReference {
                    rule: rule.to_string(),
                    value: raw.to_string(),
                }),
            };
        }
        if raw.contains("${") {
            return Err(ConfigError::InvalidCaptureReference {
                rule: rule.to_string(),
                value: raw.to_string(),
            });
        }
        SegmentPattern::new(raw)
            .map(Self::Literal)
            .map_err(|source| ConfigError::InvalidCaptureLiteral {
                rule: rule.to_string(),
                value: raw.to_string(),
                source,
            })
    }
}

impl std::fmt::Display for ConstraintValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(pattern) => write!(f, "{pattern}"),
            Self::SourceCapture(name) => write!(f, "${{from.{name}}}"),
        }
    }
}

fn is_capture_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// `capture: value` requirement on a target element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConstraint {
    capture: String,
    value: ConstraintValue,
}

impl CaptureConstraint {
    /// Creates a new constraint.
    #[must_use]
    pub fn new(capture: impl Into<String>, value: ConstraintValue) -> Self {
        Self {
            capture: capture.into(),
            value,
        }
    }

    /// Returns the constrained capture name on the target.
    #[must_use]
    pub fn capture(&self) -> &str {
        &self.capture
    }

    /// Returns the required value.
    #[must_use]
    pub fn value(&self) -> &ConstraintValue {
        &self.value
    }

    fn holds(&self, source: &ClassifiedElement, target: &ClassifiedElement) -> bool {
        let Some(actual) = target.captures().get(&self.capture) else {
            return false;
        };
        match &self.value {
            ConstraintValue::Literal(pattern) => pattern.matches(actual),
            ConstraintValue::SourceCapture(name) => source.captures().get(name) == Some(actual),
        }
    }
}

/// One entry of a rule's `allow` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// Any element of the type.
    Bare(String),
    /// Elements of the type whose captures satisfy every constraint.
    Constrained {
        /// Target element type.
        element: String,
        /// Capture requirements.
        constraints: Vec<CaptureConstraint>,
    },
}

impl TargetSpec {
    /// Returns the target element type name.
    #[must_use]
    pub fn element(&self) -> &str {
        match self {
            Self::Bare(element) | Self::Constrained { element, .. } => element,
        }
    }

    fn matches(
        &self,
        source: &ClassifiedElement,
        target: &ClassifiedElement,
        target_type: &str,
    ) -> bool {
        if self.element() != target_type {
            return false;
        }
        match self {
            Self::Bare(_) => true,
            Self::Constrained { constraints, .. } => {
                constraints.iter().all(|c| c.holds(source, target))
            }
        }
    }
}

impl std::fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bare(element) => write!(f, "{element}"),
            Self::Constrained {
                element,
                constraints,
            } => {
                write!(f, "{element} {{ ")?;
                for (i, c) in constraints.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", c.capture, c.value)?;
                }
                write!(f, " }}")
            }
        }
    }
}

/// An allow rule for one or more source element types.
#[derive(Debug, Clone)]
pub struct Rule {
    name: Option<String>,
    from: Vec<String>,
    allow: Vec<TargetSpec>,
    message: Option<String>,
}

impl Rule {
    /// Creates a new rule.
    #[must_use]
    pub fn new(from: Vec<String>, allow: Vec<TargetSpec>) -> Self {
        Self {
            name: None,
            from,
            allow,
            message: None,
        }
    }

    /// Sets a human-readable rule name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the message reported when this rule denies an edge.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the rule name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the source element types.
    #[must_use]
    pub fn from(&self) -> &[String] {
        &self.from
    }

    /// Returns the allowed targets in order.
    #[must_use]
    pub fn allow(&self) -> &[TargetSpec] {
        &self.allow
    }

    /// Returns the denial message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Tests whether the rule governs a source type.
    #[must_use]
    pub fn applies_to(&self, source_type: &str) -> bool {
        self.from.iter().any(|f| f == source_type)
    }
}

/// Identifier used in diagnostics: `rules[i]` or `rules[i] 'name'`.
#[must_use]
pub fn rule_label(index: usize, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("rules[{index}] '{name}'"),
        None => format!("rules[{index}]"),
    }
}

/// Decision for a single `(source, target)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Allowed or denied.
    pub outcome: Outcome,
    /// The rule that was consulted, if any applied.
    pub matched_rule: Option<RuleId>,
}

/// Ordered, validated rule list.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Creates a rule set, validating every reference against the catalogue.
    ///
    /// # Errors
    ///
    /// Returns all unknown element types, unknown captures and empty `from` lists.
    pub fn new(rules: Vec<Rule>, catalogue: &Catalogue) -> Result<Self, Vec<ConfigError>> {
        let mut errors = Vec::new();
        for (index, rule) in rules.iter().enumerate() {
            validate_rule(&rule_label(index, rule.name()), rule, catalogue, &mut errors);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        warn_shadowed(&rules);
        Ok(Self { rules })
    }

    /// Returns the rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns a rule by id.
    #[must_use]
    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id.0)
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Decides whether `source` may import `target`.
    #[must_use]
    pub fn evaluate(
        &self,
        source: &ClassifiedElement,
        target: &ClassifiedElement,
        catalogue: &Catalogue,
    ) -> Evaluation {
        let source_type = catalogue.type_name(source.kind());
        let target_type = catalogue.type_name(target.kind());

        let Some((index, rule)) = self
            .rules
            .iter()
            .enumerate()
            .find(|(_, r)| r.applies_to(source_type))
        else {
            return Evaluation {
                outcome: Outcome::Denied,
                matched_rule: None,
            };
        };

        let allowed = rule
            .allow
            .iter()
            .any(|spec| spec.matches(source, target, target_type));

        Evaluation {
            outcome: if allowed {
                Outcome::Allowed
            } else {
                Outcome::Denied
            },
            matched_rule: Some(RuleId(index)),
        }
    }
}

fn validate_rule(label: &str, rule: &Rule, catalogue: &Catalogue, errors: &mut Vec<ConfigError>) {
    if rule.from.is_empty() {
        errors.push(ConfigError::EmptyRuleFrom {
            rule: label.to_string(),
        });
    }

    for name in rule.from.iter().chain(rule.allow.iter().map(|s| match s {
        TargetSpec::Bare(e) | TargetSpec::Constrained { element: e, .. } => e,
    })) {
        if !catalogue.is_known_type(name) {
            errors.push(ConfigError::UnknownElementType {
                rule: label.to_string(),
                name: name.clone(),
            });
        }
    }

    for spec in &rule.allow {
        let TargetSpec::Constrained {
            element,
            constraints,
        } = spec
        else {
            continue;
        };
        if !catalogue.is_known_type(element) {
            continue;
        }
        for constraint in constraints {
            if constraint.capture == ANONYMOUS_CAPTURE {
                errors.push(ConfigError::AnonymousCaptureReference {
                    rule: label.to_string(),
                });
                continue;
            }
            if !catalogue.declares_capture(element, &constraint.capture) {
                errors.push(ConfigError::UnknownCapture {
                    rule: label.to_string(),
                    element: element.clone(),
                    capture: constraint.capture.clone(),
                });
            }
            if let ConstraintValue::SourceCapture(name) = &constraint.value {
                for from in rule.from.iter().filter(|f| catalogue.is_known_type(f)) {
                    if !catalogue.declares_capture(from, name) {
                        errors.push(ConfigError::UnknownCapture {
                            rule: label.to_string(),
                            element: from.clone(),
                            capture: name.clone(),
                        });
                    }
                }
            }
        }
    }
}

/// Later rules are unreachable for source types an earlier rule already covers.
fn warn_shadowed(rules: &[Rule]) {
    let mut covered: HashSet<&str> = HashSet::new();
    for (index, rule) in rules.iter().enumerate() {
        for from in &rule.from {
            if !covered.insert(from.as_str()) {
                tracing::warn!(
                    rule = %rule_label(index, rule.name()),
                    element = %from,
                    "rule is shadowed for this element type by an earlier rule"
                );
            }
        }
    }
}
