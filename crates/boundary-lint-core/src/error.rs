//! Configuration errors.
//!
//! Every variant is fatal: a run with any of these never evaluates an edge.
//! They are collected exhaustively and reported together.

use miette::Diagnostic;

use crate::pattern::PatternError;

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// Element type name is empty.
    #[error("elements[{index}]: type name must not be empty")]
    #[diagnostic(code(boundary_lint::config::empty_element_name))]
    EmptyElementName {
        /// Position in `[[elements]]`.
        index: usize,
    },

    /// Element type name is used twice.
    #[error("element type `{name}` is declared more than once")]
    #[diagnostic(
        code(boundary_lint::config::duplicate_element),
        help("element types are matched in declaration order; merge the patterns into one entry")
    )]
    DuplicateElement {
        /// The duplicated name.
        name: String,
    },

    /// Element type name collides with a pseudo-type.
    #[error("element type `{name}` is reserved")]
    #[diagnostic(
        code(boundary_lint::config::reserved_element),
        help("`external` and `unclassified` are assigned automatically")
    )]
    ReservedElementName {
        /// The reserved name.
        name: String,
    },

    /// Element type has no patterns.
    #[error("element type `{name}` has no patterns")]
    #[diagnostic(code(boundary_lint::config::no_patterns))]
    ElementWithoutPatterns {
        /// The element type.
        name: String,
    },

    /// Unknown match mode string.
    #[error("element type `{element}`: unknown mode `{value}`, expected: full, filename")]
    #[diagnostic(code(boundary_lint::config::unknown_mode))]
    UnknownMode {
        /// The element type.
        element: String,
        /// The invalid value.
        value: String,
    },

    /// Pattern failed to compile.
    #[error("{context}: {source}")]
    #[diagnostic(code(boundary_lint::config::invalid_pattern))]
    InvalidPattern {
        /// Where the pattern was declared.
        context: String,
        /// Compilation error.
        source: PatternError,
    },

    /// Number of `*` segments differs from the number of capture names.
    #[error(
        "element type `{element}`: pattern `{pattern}` has {found} capturing segment(s) but {expected} capture name(s)"
    )]
    #[diagnostic(
        code(boundary_lint::config::capture_count),
        help("use `_` for wildcard positions whose value is not needed")
    )]
    CaptureCountMismatch {
        /// The element type.
        element: String,
        /// The pattern.
        pattern: String,
        /// Declared capture names.
        expected: usize,
        /// `*` segments in the pattern.
        found: usize,
    },

    /// The same capture name appears twice in one pattern.
    #[error("element type `{element}`: capture `{name}` is declared twice in pattern `{pattern}`")]
    #[diagnostic(code(boundary_lint::config::duplicate_capture))]
    DuplicateCapture {
        /// The element type.
        element: String,
        /// The pattern.
        pattern: String,
        /// The duplicated capture name.
        name: String,
    },

    /// A rule has an empty `from` list.
    #[error("{rule}: `from` must name at least one element type")]
    #[diagnostic(code(boundary_lint::config::empty_from))]
    EmptyRuleFrom {
        /// Rule identifier.
        rule: String,
    },

    /// A rule refers to an element type that is not declared.
    #[error("{rule}: unknown element type `{name}`")]
    #[diagnostic(code(boundary_lint::config::unknown_element))]
    UnknownElementType {
        /// Rule identifier.
        rule: String,
        /// The undeclared type.
        name: String,
    },

    /// A rule refers to a capture that the element type never declares.
    #[error("{rule}: element type `{element}` declares no capture `{capture}`")]
    #[diagnostic(code(boundary_lint::config::unknown_capture))]
    UnknownCapture {
        /// Rule identifier.
        rule: String,
        /// The element type that lacks the capture.
        element: String,
        /// The capture name.
        capture: String,
    },

    /// A rule refers to the anonymous capture.
    #[error("{rule}: the anonymous capture `_` cannot be referenced")]
    #[diagnostic(code(boundary_lint::config::anonymous_capture))]
    AnonymousCaptureReference {
        /// Rule identifier.
        rule: String,
    },

    /// A `${...}` reference is malformed.
    #[error("{rule}: invalid capture reference `{value}`, expected `${{from.<capture>}}`")]
    #[diagnostic(code(boundary_lint::config::invalid_reference))]
    InvalidCaptureReference {
        /// Rule identifier.
        rule: String,
        /// The raw value.
        value: String,
    },

    /// A literal capture constraint failed to compile.
    #[error("{rule}: invalid capture value `{value}`: {source}")]
    #[diagnostic(code(boundary_lint::config::invalid_literal))]
    InvalidCaptureLiteral {
        /// Rule identifier.
        rule: String,
        /// The raw value.
        value: String,
        /// Compilation error.
        source: PatternError,
    },

    /// Unknown policy level string.
    #[error("{context}: unknown level `{value}`, expected: error, warning, info, off")]
    #[diagnostic(code(boundary_lint::config::unknown_level))]
    UnknownLevel {
        /// The policy key.
        context: String,
        /// The invalid value.
        value: String,
    },
}
