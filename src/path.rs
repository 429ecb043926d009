//! Dotted/indexed addresses of nodes inside a document.
//!
//! A path is a list of named segments, each optionally carrying a sibling
//! index: `root.items.item[1].name`. Paths locate differences in the report
//! and are the key the ignore rules match against.

use std::fmt;

/// Segment name used for text children of mixed-content elements.
pub const TEXT_SEGMENT: &str = "#text";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    pub name: String,
    pub index: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl PathSegment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
        }
    }

    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index: Some(index),
        }
    }
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses the textual form produced by `Display`, e.g. `a.b[2].c`.
    ///
    /// Segments whose bracket suffix is not a valid index keep the raw text
    /// as their name.
    pub fn parse(path: &str) -> Self {
        let segments = path
            .split('.')
            .filter(|s| !s.is_empty())
            .map(parse_segment)
            .collect();
        Self { segments }
    }

    /// Returns a new path with `name` appended.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::new(name));
        Self { segments }
    }

    /// Returns this path with `index` stamped on its last segment.
    pub fn indexed(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        if let Some(last) = segments.last_mut() {
            last.index = Some(index);
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

fn parse_segment(raw: &str) -> PathSegment {
    if let Some(open) = raw.rfind('[') {
        if let Some(digits) = raw[open + 1..].strip_suffix(']') {
            if let Ok(index) = digits.parse::<usize>() {
                return PathSegment::indexed(&raw[..open], index);
            }
        }
    }
    PathSegment::new(raw)
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.name, index),
            None => f.write_str(&self.name),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl serde::Serialize for Path {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
