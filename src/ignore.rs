//! Ignore rules for suppressing differences.
//!
//! An ignore entry suppresses a difference located at path `p` when:
//!
//! - the entry is a bare name equal to any segment of `p` (ignoring
//!   `metadata` suppresses everything below every `metadata` element), or
//! - the entry matches `p` itself, or
//! - the entry matches any ancestor prefix of `p`.
//!
//! Suppressed differences stay in the report; they are only flagged.
//!
//! # Pattern Syntax
//!
//! - `foo` - matches literal segment "foo" at any sibling index
//! - `foo[2]` - matches segment "foo" only at index 2
//! - `*` - matches any single path segment
//! - `**` - matches any number of path segments (including zero)
//! - `**.version` - matches "version" at any depth
//!
//! # Examples
//!
//! ```
//! use xmlcmp_rs::ignore::IgnoreList;
//! use xmlcmp_rs::path::Path;
//!
//! let ignores = IgnoreList::new(["id", "root.metadata"]);
//! assert!(ignores.is_ignored(&Path::parse("root.user.id")));
//! assert!(ignores.is_ignored(&Path::parse("root.metadata.created")));
//! assert!(!ignores.is_ignored(&Path::parse("root.user.name")));
//! ```

use crate::path::{Path, PathSegment};

/// A single segment in an ignore pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// Matches a segment by name, and by index when one is given
    Literal { name: String, index: Option<usize> },
    /// Matches any single path segment (*)
    SingleWildcard,
    /// Matches any number of path segments (**)
    DoubleWildcard,
}

/// A compiled ignore entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRule {
    pub segments: Vec<PatternSegment>,
}

impl IgnoreRule {
    pub fn parse(pattern: &str) -> Self {
        let segments = Path::parse(pattern)
            .segments()
            .iter()
            .map(|s| match s.name.as_str() {
                "**" => PatternSegment::DoubleWildcard,
                "*" => PatternSegment::SingleWildcard,
                _ => PatternSegment::Literal {
                    name: s.name.clone(),
                    index: s.index,
                },
            })
            .collect();
        Self { segments }
    }

    /// True when the whole of `path` matches this pattern.
    pub fn matches(&self, path: &[PathSegment]) -> bool {
        matches_recursive(&self.segments, path)
    }

    /// True for single literal entries such as `id`.
    fn is_bare_name(&self) -> bool {
        matches!(self.segments.as_slice(), [PatternSegment::Literal { .. }])
    }

    /// Applies the bare-name, full-path and ancestor-prefix rules.
    pub fn suppresses(&self, path: &Path) -> bool {
        if path.is_empty() {
            return false;
        }
        let segments = path.segments();

        if self.is_bare_name() {
            return segments
                .iter()
                .any(|segment| self.matches(std::slice::from_ref(segment)));
        }

        (1..=segments.len()).any(|len| self.matches(&segments[..len]))
    }
}

fn matches_recursive(pattern: &[PatternSegment], path: &[PathSegment]) -> bool {
    match (pattern.first(), path.first()) {
        (None, None) => true,
        (None, Some(_)) => false,
        (Some(_seg), None) => pattern
            .iter()
            .all(|s| matches!(s, PatternSegment::DoubleWildcard)),
        (Some(seg), Some(path_seg)) => match seg {
            PatternSegment::Literal { name, index } => {
                let name_matches = name == &path_seg.name;
                let index_matches = index.is_none() || *index == path_seg.index;
                if name_matches && index_matches {
                    matches_recursive(&pattern[1..], &path[1..])
                } else {
                    false
                }
            }
            PatternSegment::SingleWildcard => matches_recursive(&pattern[1..], &path[1..]),
            PatternSegment::DoubleWildcard => {
                matches_recursive(&pattern[1..], path) || matches_recursive(pattern, &path[1..])
            }
        },
    }
}

/// The compiled ignore-list of one comparison. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    rules: Vec<IgnoreRule>,
}

impl IgnoreList {
    /// Compiles entries, discarding blank ones.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = entries
            .into_iter()
            .map(|entry| entry.as_ref().trim().to_string())
            .filter(|entry| !entry.is_empty())
            .map(|entry| IgnoreRule::parse(&entry))
            .collect();
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when any rule suppresses a difference at `path`.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.rules.iter().any(|rule| rule.suppresses(path))
    }

    /// Checks the member `name` (attribute or child key) of `parent`.
    pub fn is_ignored_member(&self, name: &str, parent: &Path) -> bool {
        self.is_ignored(&parent.child(name))
    }
}
