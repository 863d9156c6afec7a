//! Path pattern matching with positional captures.
//!
//! Patterns are `/`-separated segments:
//!
//! - `*` matches exactly one segment and captures it
//! - `**` matches zero or more segments and never captures
//! - a segment containing `*`, `?` or `[` (e.g. `*.css`) is a glob
//!   confined to one segment and never captures
//! - anything else is a case-sensitive literal
//!
//! Matching is anchored: the whole path has to be consumed.

use std::fmt;

/// Which part of a path a pattern is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// The whole path.
    #[default]
    Full,
    /// Only the last path segment.
    Filename,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Filename => write!(f, "filename"),
        }
    }
}

/// Errors when compiling a pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// Pattern is empty.
    #[error("pattern must not be empty")]
    Empty,

    /// `**` appears inside a segment instead of as a whole segment.
    #[error("`**` must be a whole path segment in `{pattern}`")]
    MisplacedGlobstar {
        /// The offending pattern.
        pattern: String,
    },

    /// Filename patterns cannot contain directories.
    #[error("filename pattern `{pattern}` must be a single segment")]
    FilenameWithDirectory {
        /// The offending pattern.
        pattern: String,
    },

    /// Segment glob has invalid syntax.
    #[error("invalid glob `{pattern}`: {reason}")]
    InvalidGlob {
        /// The offending pattern.
        pattern: String,
        /// Why it's invalid.
        reason: String,
    },
}

/// Matcher for a single path segment: exact text or a segment glob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentPattern {
    /// Exact, case-sensitive text.
    Exact(String),
    /// Glob confined to one segment.
    Glob(glob::Pattern),
}

impl SegmentPattern {
    /// Compiles a segment matcher.
    ///
    /// # Errors
    ///
    /// Returns error if the glob syntax is invalid.
    pub fn new(segment: &str) -> Result<Self, PatternError> {
        if !has_glob_meta(segment) {
            return Ok(Self::Exact(segment.to_string()));
        }
        glob::Pattern::new(segment)
            .map(Self::Glob)
            .map_err(|e| PatternError::InvalidGlob {
                pattern: segment.to_string(),
                reason: e.to_string(),
            })
    }

    /// Tests a single segment.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exact(text) => text == value,
            Self::Glob(glob) => glob.matches(value),
        }
    }

    fn as_exact(&self) -> Option<&str> {
        match self {
            Self::Exact(text) => Some(text),
            Self::Glob(_) => None,
        }
    }
}

impl fmt::Display for SegmentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(text) => write!(f, "{text}"),
            Self::Glob(glob) => write!(f, "{}", glob.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Capture,
    Globstar,
    Fixed(SegmentPattern),
}

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    mode: MatchMode,
    segments: Vec<Segment>,
    capture_count: usize,
}

impl PathPattern {
    /// Compiles a pattern for the given mode.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern is empty, malformed, or a filename
    /// pattern spans directories.
    pub fn new(pattern: &str, mode: MatchMode) -> Result<Self, PatternError> {
        let parts = split_segments(pattern);
        if parts.is_empty() {
            return Err(PatternError::Empty);
        }
        if mode == MatchMode::Filename && parts.len() != 1 {
            return Err(PatternError::FilenameWithDirectory {
                pattern: pattern.to_string(),
            });
        }

        let mut segments = Vec::with_capacity(parts.len());
        for part in parts {
            let segment = match part {
                "**" => {
                    // Adjacent globstars are equivalent to one.
                    if segments.last() == Some(&Segment::Globstar) {
                        continue;
                    }
                    Segment::Globstar
                }
                "*" => Segment::Capture,
                p if p.contains("**") => {
                    return Err(PatternError::MisplacedGlobstar {
                        pattern: pattern.to_string(),
                    })
                }
                p => Segment::Fixed(SegmentPattern::new(p)?),
            };
            segments.push(segment);
        }

        let capture_count = segments
            .iter()
            .filter(|s| matches!(s, Segment::Capture))
            .count();

        Ok(Self {
            raw: pattern.to_string(),
            mode,
            segments,
            capture_count,
        })
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the match mode.
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Number of capturing `*` segments.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.capture_count
    }

    /// Matches a path, returning the captured segments in declaration order.
    ///
    /// Returns `None` when the pattern does not match. On success the
    /// vector always holds exactly [`capture_count`](Self::capture_count)
    /// values.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<Vec<String>> {
        let parts = split_segments(path);
        let subject = match self.mode {
            MatchMode::Full => &parts[..],
            MatchMode::Filename => match parts.split_last() {
                Some((last, _)) => std::slice::from_ref(last),
                None => return None,
            },
        };

        let mut captures = Vec::with_capacity(self.capture_count);
        match_segments(&self.segments, subject, &mut captures).then_some(captures)
    }

    /// Leading literal segments of a full-mode pattern.
    ///
    /// Filename patterns have no root and return `None`.
    #[must_use]
    pub fn literal_root(&self) -> Option<Vec<&str>> {
        if self.mode == MatchMode::Filename {
            return None;
        }
        Some(
            self.segments
                .iter()
                .map_while(|s| match s {
                    Segment::Fixed(p) => p.as_exact(),
                    _ => None,
                })
                .collect(),
        )
    }

    /// Tests whether a path lies under this pattern's literal root.
    #[must_use]
    pub fn roots(&self, path: &str) -> bool {
        let Some(root) = self.literal_root() else {
            return false;
        };
        let parts = split_segments(path);
        parts.len() >= root.len() && parts.iter().zip(&root).all(|(p, r)| p == r)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Normalises a path to `/`-separated form without `.` or empty segments.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    split_segments(path).join("/")
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

fn has_glob_meta(segment: &str) -> bool {
    segment.contains(['*', '?', '['])
}

/// Backtracking matcher. Leaves `captures` untouched when returning false.
fn match_segments(pattern: &[Segment], path: &[&str], captures: &mut Vec<String>) -> bool {
    let Some((first, rest)) = pattern.split_first() else {
        return path.is_empty();
    };

    match first {
        Segment::Globstar => {
            // Shortest extension first keeps captures deterministic.
            for skip in 0..=path.len() {
                let mark = captures.len();
                if match_segments(rest, &path[skip..], captures) {
                    return true;
                }
                captures.truncate(mark);
            }
            false
        }
        Segment::Capture => {
            let Some((head, tail)) = path.split_first() else {
                return false;
            };
            captures.push((*head).to_string());
            if match_segments(rest, tail, captures) {
                true
            } else {
                captures.pop();
                false
            }
        }
        Segment::Fixed(segment) => path
            .split_first()
            .is_some_and(|(head, tail)| segment.matches(head) && match_segments(rest, tail, captures)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(p: &str) -> PathPattern {
        PathPattern::new(p, MatchMode::Full).unwrap()
    }

    #[test]
    fn literal_pattern_is_anchored() {
        let pat = full("src/lib/db.ts");
        assert_eq!(pat.matches("src/lib/db.ts"), Some(vec![]));
        assert!(pat.matches("src/lib/db.ts/extra").is_none());
        assert!(pat.matches("app/src/lib/db.ts").is_none());
    }

    #[test]
    fn matching_is_case_sensitive() {
        let pat = full("src/components/**");
        assert!(pat.matches("src/components/Button.tsx").is_some());
        assert!(pat.matches("src/Components/Button.tsx").is_none());
    }

    #[test]
    fn star_captures_one_segment() {
        let pat = full("src/features/*/**");
        assert_eq!(
            pat.matches("src/features/auth/login.ts"),
            Some(vec!["auth".to_string()])
        );
        assert_eq!(
            pat.matches("src/features/auth/ui/form/field.tsx"),
            Some(vec!["auth".to_string()])
        );
        assert!(pat.matches("src/components/button.ts").is_none());
    }

    #[test]
    fn captures_follow_declaration_order() {
        let pat = full("src/app/*/*");
        assert_eq!(pat.capture_count(), 2);
        assert_eq!(
            pat.matches("src/app/dashboard/page.tsx"),
            Some(vec!["dashboard".to_string(), "page.tsx".to_string()])
        );
        assert!(pat.matches("src/app/page.tsx").is_none());
    }

    #[test]
    fn globstar_matches_zero_segments() {
        let pat = full("src/**/index.ts");
        assert!(pat.matches("src/index.ts").is_some());
        assert!(pat.matches("src/a/b/c/index.ts").is_some());
        assert!(pat.matches("src/a/b/c/main.ts").is_none());
    }

    #[test]
    fn globstar_never_captures() {
        let pat = full("**/*");
        assert_eq!(pat.capture_count(), 1);
        assert_eq!(
            pat.matches("deep/nested/file.ts"),
            Some(vec!["file.ts".to_string()])
        );
    }

    #[test]
    fn leading_globstar_backtracks_to_first_fit() {
        let pat = full("**/*/x");
        assert_eq!(pat.matches("a/b/c/x"), Some(vec!["c".to_string()]));
    }

    #[test]
    fn segment_glob_matches_suffix() {
        let pat = full("src/styles/*.css");
        assert_eq!(pat.capture_count(), 0);
        assert!(pat.matches("src/styles/app.css").is_some());
        assert!(pat.matches("src/styles/app.scss").is_none());
        assert!(pat.matches("src/styles/nested/app.css").is_none());
    }

    #[test]
    fn filename_mode_ignores_directories() {
        let pat = PathPattern::new("*.css", MatchMode::Filename).unwrap();
        assert!(pat.matches("src/app/foo/bar.css").is_some());
        assert!(pat.matches("anywhere/else/baz.css").is_some());
        assert!(pat.matches("baz.css").is_some());
        assert!(pat.matches("src/app/foo/bar.ts").is_none());
    }

    #[test]
    fn filename_mode_rejects_directories() {
        assert!(matches!(
            PathPattern::new("styles/*.css", MatchMode::Filename),
            Err(PatternError::FilenameWithDirectory { .. })
        ));
    }

    #[test]
    fn empty_pattern_rejected() {
        assert_eq!(PathPattern::new("", MatchMode::Full), Err(PatternError::Empty));
        assert_eq!(PathPattern::new("./", MatchMode::Full), Err(PatternError::Empty));
    }

    #[test]
    fn misplaced_globstar_rejected() {
        assert!(matches!(
            PathPattern::new("src/a**/x", MatchMode::Full),
            Err(PatternError::MisplacedGlobstar { .. })
        ));
    }

    #[test]
    fn paths_are_normalized() {
        let pat = full("src/lib/**");
        assert!(pat.matches("./src/lib/db.ts").is_some());
        assert!(pat.matches("src//lib/db.ts").is_some());
        assert_eq!(normalize_path("./src//lib/"), "src/lib");
    }

    #[test]
    fn literal_root_stops_at_first_wildcard() {
        assert_eq!(full("src/features/*/**").literal_root(), Some(vec!["src", "features"]));
        assert_eq!(full("**/*.ts").literal_root(), Some(vec![]));
        assert_eq!(
            PathPattern::new("*.css", MatchMode::Filename)
                .unwrap()
                .literal_root(),
            None
        );
    }

    #[test]
    fn roots_checks_prefix_by_segment() {
        let pat = full("src/features/*/**");
        assert!(pat.roots("src/features/readme.md"));
        assert!(!pat.roots("src/featuresx/a.ts"));
        assert!(!pat.roots("lib/a.ts"));
    }

    #[test]
    fn segment_pattern_exact_and_glob() {
        let exact = SegmentPattern::new("page.tsx").unwrap();
        assert!(exact.matches("page.tsx"));
        assert!(!exact.matches("Page.tsx"));

        let glob = SegmentPattern::new("*.css").unwrap();
        assert!(glob.matches("globals.css"));
        assert!(!glob.matches("globals.ts"));
    }
}
