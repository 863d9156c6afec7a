//! Element type catalogue and file classification.
//!
//! The catalogue is an ordered arena of [`ElementType`]s. Classification
//! scans it top-down, and within a type scans its patterns in order; the
//! first `(type, pattern)` pair that matches wins. Overlapping patterns
//! across types are allowed and resolved by declaration order alone.

use std::collections::{BTreeMap, HashMap};

use crate::error::ConfigError;
use crate::pattern::{MatchMode, PathPattern};

/// Pseudo-type for targets outside the catalogued tree.
pub const EXTERNAL_TYPE: &str = "external";

/// Pseudo-type for catalogued paths that match no element type.
pub const UNCLASSIFIED_TYPE: &str = "unclassified";

/// Capture name whose value is discarded.
pub const ANONYMOUS_CAPTURE: &str = "_";

/// Capture carried by external elements: the raw import identifier.
pub const SPECIFIER_CAPTURE: &str = "specifier";

/// Index of an element type in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    /// Declaration index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A path pattern together with the names bound to its `*` segments.
#[derive(Debug, Clone)]
pub struct PatternSpec {
    pattern: PathPattern,
    capture_names: Vec<String>,
}

impl PatternSpec {
    /// Creates a pattern spec, checking the capture names against the pattern.
    ///
    /// An empty name list leaves the pattern's wildcards uncaptured.
    ///
    /// # Errors
    ///
    /// Returns every capture problem found: count mismatch and duplicate names.
    pub fn new(
        element: &str,
        pattern: PathPattern,
        capture_names: Vec<String>,
    ) -> Result<Self, Vec<ConfigError>> {
        let mut errors = Vec::new();

        if !capture_names.is_empty() && capture_names.len() != pattern.capture_count() {
            errors.push(ConfigError::CaptureCountMismatch {
                element: element.to_string(),
                pattern: pattern.as_str().to_string(),
                expected: capture_names.len(),
                found: pattern.capture_count(),
            });
        }

        for (i, name) in capture_names.iter().enumerate() {
            if name != ANONYMOUS_CAPTURE && capture_names[..i].contains(name) {
                errors.push(ConfigError::DuplicateCapture {
                    element: element.to_string(),
                    pattern: pattern.as_str().to_string(),
                    name: name.clone(),
                });
            }
        }

        if errors.is_empty() {
            Ok(Self {
                pattern,
                capture_names,
            })
        } else {
            Err(errors)
        }
    }

    /// Returns the compiled pattern.
    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Returns the capture names, in wildcard order.
    #[must_use]
    pub fn capture_names(&self) -> &[String] {
        &self.capture_names
    }

    /// Matches a path and binds the named captures.
    fn bind(&self, path: &str) -> Option<CaptureSet> {
        let values = self.pattern.matches(path)?;
        let mut captures = CaptureSet::new();
        for (name, value) in self.capture_names.iter().zip(values) {
            if name != ANONYMOUS_CAPTURE {
                captures.insert(name.clone(), value);
            }
        }
        Some(captures)
    }
}

/// A named architectural category assigned to files by path pattern.
#[derive(Debug, Clone)]
pub struct ElementType {
    name: String,
    mode: MatchMode,
    patterns: Vec<PatternSpec>,
}

impl ElementType {
    /// Creates a new element type.
    #[must_use]
    pub fn new(name: impl Into<String>, mode: MatchMode, patterns: Vec<PatternSpec>) -> Self {
        Self {
            name: name.into(),
            mode,
            patterns,
        }
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the match mode.
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Returns the patterns in declaration order.
    #[must_use]
    pub fn patterns(&self) -> &[PatternSpec] {
        &self.patterns
    }

    /// Tests whether at least one pattern declares the capture.
    #[must_use]
    pub fn declares_capture(&self, capture: &str) -> bool {
        capture != ANONYMOUS_CAPTURE
            && self
                .patterns
                .iter()
                .any(|p| p.capture_names.iter().any(|n| n == capture))
    }

    fn classify(&self, path: &str) -> Option<CaptureSet> {
        self.patterns.iter().find_map(|p| p.bind(path))
    }
}

/// Named captures of one classification result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureSet(BTreeMap<String, String>);

impl CaptureSet {
    /// Creates an empty capture set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a capture.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Looks up a capture value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates captures in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for CaptureSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (name, value) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}

/// What a classified path turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A declared element type.
    Typed(TypeId),
    /// Catalogued path matching no element type.
    Unclassified,
    /// Target outside the catalogued tree.
    External,
}

/// Result of classifying one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedElement {
    path: String,
    kind: ElementKind,
    captures: CaptureSet,
}

impl ClassifiedElement {
    /// Builds the pseudo-element for an import outside the catalogued tree.
    #[must_use]
    pub fn external(identifier: &str) -> Self {
        let mut captures = CaptureSet::new();
        captures.insert(SPECIFIER_CAPTURE, identifier);
        Self {
            path: identifier.to_string(),
            kind: ElementKind::External,
            captures,
        }
    }

    /// Returns the classified path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the element kind.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Returns the named captures.
    #[must_use]
    pub fn captures(&self) -> &CaptureSet {
        &self.captures
    }

    /// Returns true if no element type matched.
    #[must_use]
    pub fn is_unclassified(&self) -> bool {
        self.kind == ElementKind::Unclassified
    }
}

/// Ordered, validated set of element types.
#[derive(Debug, Clone)]
pub struct Catalogue {
    types: Vec<ElementType>,
    by_name: HashMap<String, TypeId>,
}

impl Catalogue {
    /// Creates a catalogue, validating type names.
    ///
    /// # Errors
    ///
    /// Returns all duplicate and reserved type names.
    pub fn new(types: Vec<ElementType>) -> Result<Self, Vec<ConfigError>> {
        let (catalogue, errors) = Self::build(types);
        if errors.is_empty() {
            Ok(catalogue)
        } else {
            Err(errors)
        }
    }

    /// Builds a catalogue from the first declaration of each usable name,
    /// returning the rejected duplicate and reserved names alongside it.
    #[must_use]
    pub fn build(types: Vec<ElementType>) -> (Self, Vec<ConfigError>) {
        let mut kept = Vec::with_capacity(types.len());
        let mut by_name = HashMap::with_capacity(types.len());
        let mut errors = Vec::new();

        for element in types {
            if is_pseudo_type(element.name()) {
                errors.push(ConfigError::ReservedElementName { name: element.name });
            } else if by_name.contains_key(&element.name) {
                errors.push(ConfigError::DuplicateElement { name: element.name });
            } else {
                by_name.insert(element.name.clone(), TypeId(kept.len()));
                kept.push(element);
            }
        }

        (
            Self {
                types: kept,
                by_name,
            },
            errors,
        )
    }

    /// Returns the element types in declaration order.
    #[must_use]
    pub fn types(&self) -> &[ElementType] {
        &self.types
    }

    /// Returns the element type for an id issued by this catalogue.
    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&ElementType> {
        self.types.get(id.0)
    }

    /// Finds a declared element type by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Tests whether a name is a declared type or a pseudo-type.
    #[must_use]
    pub fn is_known_type(&self, name: &str) -> bool {
        is_pseudo_type(name) || self.by_name.contains_key(name)
    }

    /// Resolves the type name of an element kind.
    #[must_use]
    pub fn type_name(&self, kind: ElementKind) -> &str {
        match kind {
            ElementKind::Typed(id) => self.get(id).map_or(UNCLASSIFIED_TYPE, ElementType::name),
            ElementKind::Unclassified => UNCLASSIFIED_TYPE,
            ElementKind::External => EXTERNAL_TYPE,
        }
    }

    /// Tests whether a type (declared or pseudo) declares a capture.
    #[must_use]
    pub fn declares_capture(&self, type_name: &str, capture: &str) -> bool {
        match type_name {
            EXTERNAL_TYPE => capture == SPECIFIER_CAPTURE,
            UNCLASSIFIED_TYPE => false,
            name => self
                .lookup(name)
                .and_then(|id| self.get(id))
                .is_some_and(|t| t.declares_capture(capture)),
        }
    }

    /// Classifies a path: first matching type, first matching pattern.
    #[must_use]
    pub fn classify(&self, path: &str) -> ClassifiedElement {
        let path = crate::pattern::normalize_path(path);
        for (index, element) in self.types.iter().enumerate() {
            if let Some(captures) = element.classify(&path) {
                tracing::trace!(path = %path, element = element.name(), "classified");
                return ClassifiedElement {
                    path,
                    kind: ElementKind::Typed(TypeId(index)),
                    captures,
                };
            }
        }
        tracing::trace!(path = %path, "unclassified");
        ClassifiedElement {
            path,
            kind: ElementKind::Unclassified,
            captures: CaptureSet::new(),
        }
    }

    /// Tests whether a path lies under the literal root of any full-mode pattern.
    #[must_use]
    pub fn is_rooted(&self, path: &str) -> bool {
        self.types
            .iter()
            .flat_map(ElementType::patterns)
            .any(|p| p.pattern().roots(path))
    }
}

fn is_pseudo_type(name: &str) -> bool {
    name == EXTERNAL_TYPE || name == UNCLASSIFIED_TYPE
}
