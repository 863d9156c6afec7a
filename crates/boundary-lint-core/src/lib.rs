//! # boundary-lint-core
//!
//! Architectural boundary enforcement over a pre-computed import graph.
//!
//! Files are assigned to named element types by path pattern, then every
//! import edge is checked against an ordered list of allow rules. Anything
//! no rule allows is denied.
//!
//! - [`Catalogue`] classifies paths into element types, binding `*` captures
//! - [`RuleSet`] decides whether one element may import another
//! - [`BoundaryChecker`] runs both over a file list and edge list
//! - [`CheckReport`] carries verdicts, file findings and violations
//!
//! ## Example
//!
//! ```ignore
//! use boundary_lint_core::{BoundaryChecker, ImportEdge, Severity};
//!
//! let checker = BoundaryChecker::from_toml(&std::fs::read_to_string("boundary-lint.toml")?)?;
//! let files = vec!["src/features/auth/login.ts".to_string(), "src/lib/db.ts".to_string()];
//! let edges = vec![ImportEdge::new("src/features/auth/login.ts", "src/lib/db.ts")];
//!
//! let report = checker.check(&files, &edges);
//! if report.has_errors() {
//!     panic!("{}", report.format_test_report(Severity::Error));
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalogue;
mod checker;
pub mod config;
mod error;
pub mod pattern;
pub mod ruleset;
mod types;

pub use catalogue::{Catalogue, ClassifiedElement, ElementKind, ElementType, PatternSpec};
pub use checker::BoundaryChecker;
pub use config::{load_from_toml, LoadError, LoadedConfig, Policy, Settings};
pub use error::ConfigError;
pub use pattern::{MatchMode, PathPattern, PatternError};
pub use ruleset::{Rule, RuleSet, TargetSpec};
pub use types::{
    CheckReport, FileFinding, FindingKind, ImportEdge, Outcome, Severity, Verdict, Violation,
};
