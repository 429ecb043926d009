//! Structural XML diff.
//!
//! Two parsed documents are walked in lock-step. Each matched pair of
//! elements is compared twice: once for attributes and once for content.
//! Attribute differences are reported first, then structural ones, each
//! list in pre-order. Comparison is strictly positional; no alignment search
//! is made between sibling lists.
//!
//! Children of an element are grouped by key (the element name, or `#text`
//! for text in mixed content). A key present on one side only is an
//! `Element` difference. A key held by exactly one node on each side is
//! compared at `parent.key`. Any other key is a sequence: it is compared
//! index by index at `parent.key[i]`, after a `Structure` difference if the
//! lengths differ.
//!
//! # Examples
//!
//! ```
//! use xmlcmp_rs::diff::{diff_documents, DiffConfig, DifferenceKind};
//! use xmlcmp_rs::ignore::IgnoreList;
//! use xmlcmp_rs::parser::parse_xml;
//!
//! let left = parse_xml("<root><id>1</id><name>Bob</name></root>").unwrap();
//! let right = parse_xml("<root><id>2</id><name>Bob</name></root>").unwrap();
//!
//! let ignores = IgnoreList::new(["id"]);
//! let diffs = diff_documents(&left, &right, &ignores, &DiffConfig::default()).unwrap();
//!
//! assert_eq!(diffs.len(), 1);
//! assert_eq!(diffs[0].kind, DifferenceKind::Text);
//! assert_eq!(diffs[0].path.to_string(), "root.id");
//! assert!(diffs[0].ignored);
//! ```

use crate::error::ComparisonError;
use crate::ignore::IgnoreList;
use crate::path::{Path, TEXT_SEGMENT};
use crate::tree::{Document, Element, Node};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// What kind of content a difference concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DifferenceKind {
    Attribute,
    Element,
    Text,
    Structure,
}

/// A single difference between the two documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Difference {
    #[serde(rename = "type")]
    pub kind: DifferenceKind,
    pub path: Path,
    /// Value on the first document's side, if it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    /// Value on the second document's side, if it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    pub description: String,
    /// Suppressed by the ignore-list: reported but not scored
    pub ignored: bool,
}

/// Counts of differences by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub attribute: usize,
    pub element: usize,
    pub text: usize,
    pub structure: usize,
    pub ignored: usize,
}

impl DiffStats {
    pub fn from_differences(differences: &[Difference]) -> Self {
        let mut stats = Self::default();
        for difference in differences {
            match difference.kind {
                DifferenceKind::Attribute => stats.attribute += 1,
                DifferenceKind::Element => stats.element += 1,
                DifferenceKind::Text => stats.text += 1,
                DifferenceKind::Structure => stats.structure += 1,
            }
            if difference.ignored {
                stats.ignored += 1;
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.attribute + self.element + self.text + self.structure
    }

    /// Differences that count against the match ratio.
    pub fn scored(&self) -> usize {
        self.total() - self.ignored
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Configuration for the diff algorithm.
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Maximum element depth walked before giving up
    pub max_depth: usize,
    /// Length at which element previews in difference values are truncated
    pub max_value_length: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_depth: 512,
            max_value_length: 120,
        }
    }
}

/// Computes every difference between two documents.
///
/// Ignored differences are kept in the result with `ignored` set.
///
/// # Errors
///
/// Returns [`ComparisonError::DepthExceeded`] when the trees nest deeper than
/// `config.max_depth`.
pub fn diff_documents(
    left: &Document,
    right: &Document,
    ignores: &IgnoreList,
    config: &DiffConfig,
) -> Result<Vec<Difference>, ComparisonError> {
    let mut traversal = Traversal::new(ignores, config);
    traversal.compare_groups(
        root_group(&left.root),
        root_group(&right.root),
        &Path::root(),
        0,
    )?;

    let Traversal {
        mut attributes,
        structure,
        ..
    } = traversal;
    attributes.extend(structure);

    tracing::debug!(differences = attributes.len(), "diff complete");
    Ok(attributes)
}

/// Borrowed view of a node, so the root element can be grouped like a child.
#[derive(Debug, Clone, Copy)]
enum NodeRef<'a> {
    Element(&'a Element),
    Text(&'a str),
}

type Groups<'a> = IndexMap<&'a str, Vec<NodeRef<'a>>>;

fn root_group(root: &Element) -> Groups<'_> {
    let mut groups = Groups::new();
    groups.insert(root.name.as_str(), vec![NodeRef::Element(root)]);
    groups
}

/// Groups children by key in first-appearance order.
fn group_children(children: &[Node]) -> Groups<'_> {
    let mut groups = Groups::new();
    for child in children {
        let (key, node) = match child {
            Node::Element(element) => (element.name.as_str(), NodeRef::Element(element)),
            Node::Text(text) => (TEXT_SEGMENT, NodeRef::Text(text.as_str())),
        };
        groups.entry(key).or_default().push(node);
    }
    groups
}

/// State of one comparison. Never shared between comparisons.
struct Traversal<'c> {
    ignores: &'c IgnoreList,
    config: &'c DiffConfig,
    visited: HashSet<String>,
    attributes: Vec<Difference>,
    structure: Vec<Difference>,
}

impl<'c> Traversal<'c> {
    fn new(ignores: &'c IgnoreList, config: &'c DiffConfig) -> Self {
        Self {
            ignores,
            config,
            visited: HashSet::new(),
            attributes: Vec::new(),
            structure: Vec::new(),
        }
    }

    /// Marks `path` visited. Returns false if it was already visited.
    fn visit(&mut self, path: &Path) -> bool {
        self.visited.insert(path.to_string())
    }

    fn difference(
        &self,
        kind: DifferenceKind,
        path: Path,
        left: Option<String>,
        right: Option<String>,
        description: &str,
    ) -> Difference {
        let ignored = self.ignores.is_ignored(&path);
        Difference {
            kind,
            path,
            left,
            right,
            description: description.to_string(),
            ignored,
        }
    }

    /// Difference on the member `name` (attribute or child key) of `parent`.
    fn member_difference(
        &self,
        kind: DifferenceKind,
        parent: &Path,
        name: &str,
        left: Option<String>,
        right: Option<String>,
        description: &str,
    ) -> Difference {
        Difference {
            kind,
            path: parent.child(name),
            left,
            right,
            description: description.to_string(),
            ignored: self.ignores.is_ignored_member(name, parent),
        }
    }

    fn value_of(&self, node: NodeRef<'_>) -> String {
        match node {
            NodeRef::Text(text) => text.to_string(),
            NodeRef::Element(element) => element.preview(self.config.max_value_length),
        }
    }

    fn summarize(&self, nodes: &[NodeRef<'_>]) -> String {
        match nodes {
            [single] => self.value_of(*single),
            many => format!("[ {} items ]", many.len()),
        }
    }

    fn compare_groups(
        &mut self,
        left: Groups<'_>,
        right: Groups<'_>,
        parent: &Path,
        depth: usize,
    ) -> Result<(), ComparisonError> {
        for (key, nodes) in left.iter().filter(|(key, _)| !right.contains_key(*key)) {
            let difference = self.member_difference(
                DifferenceKind::Element,
                parent,
                key,
                Some(self.summarize(nodes)),
                None,
                "Element missing in second document",
            );
            self.structure.push(difference);
        }

        for (key, nodes) in right.iter().filter(|(key, _)| !left.contains_key(*key)) {
            let difference = self.member_difference(
                DifferenceKind::Element,
                parent,
                key,
                None,
                Some(self.summarize(nodes)),
                "Element missing in first document",
            );
            self.structure.push(difference);
        }

        for (key, left_nodes) in &left {
            let Some(right_nodes) = right.get(key) else {
                continue;
            };
            let path = parent.child(key);
            match (left_nodes.as_slice(), right_nodes.as_slice()) {
                ([l], [r]) => self.compare_nodes(Some(*l), Some(*r), path, depth)?,
                _ => self.compare_sequences(left_nodes, right_nodes, path, depth)?,
            }
        }

        Ok(())
    }

    fn compare_sequences(
        &mut self,
        left: &[NodeRef<'_>],
        right: &[NodeRef<'_>],
        path: Path,
        depth: usize,
    ) -> Result<(), ComparisonError> {
        if !self.visit(&path) {
            return Ok(());
        }

        if left.len() != right.len() {
            let difference = self.difference(
                DifferenceKind::Structure,
                path.clone(),
                Some(left.len().to_string()),
                Some(right.len().to_string()),
                "Lengths differ",
            );
            self.structure.push(difference);
        }

        for i in 0..left.len().max(right.len()) {
            self.compare_nodes(
                left.get(i).copied(),
                right.get(i).copied(),
                path.indexed(i),
                depth,
            )?;
        }

        Ok(())
    }

    fn compare_nodes(
        &mut self,
        left: Option<NodeRef<'_>>,
        right: Option<NodeRef<'_>>,
        path: Path,
        depth: usize,
    ) -> Result<(), ComparisonError> {
        if !self.visit(&path) {
            return Ok(());
        }

        let difference = match (left, right) {
            (None, None) => return Ok(()),
            (Some(l), None) => self.difference(
                DifferenceKind::Structure,
                path,
                Some(self.value_of(l)),
                None,
                "Missing in second document",
            ),
            (None, Some(r)) => self.difference(
                DifferenceKind::Structure,
                path,
                None,
                Some(self.value_of(r)),
                "Missing in first document",
            ),
            (Some(NodeRef::Text(a)), Some(NodeRef::Text(b))) => {
                if a == b {
                    return Ok(());
                }
                self.difference(
                    DifferenceKind::Text,
                    path,
                    Some(a.to_string()),
                    Some(b.to_string()),
                    "Values differ",
                )
            }
            (Some(NodeRef::Element(a)), Some(NodeRef::Element(b))) => {
                return self.compare_elements(a, b, path, depth + 1);
            }
            (Some(l @ NodeRef::Text(_)), Some(r @ NodeRef::Element(_)))
            | (Some(l @ NodeRef::Element(_)), Some(r @ NodeRef::Text(_))) => self.difference(
                DifferenceKind::Structure,
                path,
                Some(self.value_of(l)),
                Some(self.value_of(r)),
                "Type mismatch: text vs element",
            ),
        };

        self.structure.push(difference);
        Ok(())
    }

    fn compare_elements(
        &mut self,
        left: &Element,
        right: &Element,
        path: Path,
        depth: usize,
    ) -> Result<(), ComparisonError> {
        if depth > self.config.max_depth {
            return Err(ComparisonError::DepthExceeded {
                path: path.to_string(),
                limit: self.config.max_depth,
            });
        }

        self.compare_attributes(left, right, &path);

        match (left.text_only(), right.text_only()) {
            (Some(a), Some(b)) => {
                if a != b {
                    let difference = self.difference(
                        DifferenceKind::Text,
                        path,
                        Some(a.to_string()),
                        Some(b.to_string()),
                        "Text content differs",
                    );
                    self.structure.push(difference);
                }
                Ok(())
            }
            (Some(a), None) => {
                let difference = self.difference(
                    DifferenceKind::Text,
                    path,
                    Some(a.to_string()),
                    Some(content_value(right, self.config.max_value_length)),
                    "Text content differs",
                );
                self.structure.push(difference);
                Ok(())
            }
            (None, Some(b)) => {
                let difference = self.difference(
                    DifferenceKind::Text,
                    path,
                    Some(content_value(left, self.config.max_value_length)),
                    Some(b.to_string()),
                    "Text content differs",
                );
                self.structure.push(difference);
                Ok(())
            }
            (None, None) => self.compare_groups(
                group_children(&left.children),
                group_children(&right.children),
                &path,
                depth,
            ),
        }
    }

    fn compare_attributes(&mut self, left: &Element, right: &Element, path: &Path) {
        for (name, value) in &left.attributes {
            if !right.attributes.contains_key(name) {
                let difference = self.member_difference(
                    DifferenceKind::Attribute,
                    path,
                    name,
                    Some(value.clone()),
                    None,
                    "Attribute missing in second document",
                );
                self.attributes.push(difference);
            }
        }

        for (name, value) in &right.attributes {
            if !left.attributes.contains_key(name) {
                let difference = self.member_difference(
                    DifferenceKind::Attribute,
                    path,
                    name,
                    None,
                    Some(value.clone()),
                    "Attribute missing in first document",
                );
                self.attributes.push(difference);
            }
        }

        for (name, left_value) in &left.attributes {
            if let Some(right_value) = right.attributes.get(name) {
                if left_value != right_value {
                    let difference = self.member_difference(
                        DifferenceKind::Attribute,
                        path,
                        name,
                        Some(left_value.clone()),
                        Some(right_value.clone()),
                        "Attribute values differ",
                    );
                    self.attributes.push(difference);
                }
            }
        }
    }
}

/// Display value of an element's content: its text, nothing, or a preview.
fn content_value(element: &Element, max_len: usize) -> String {
    match element.text_only() {
        Some(text) => text.to_string(),
        None if element.children.is_empty() => String::new(),
        None => element.preview(max_len),
    }
}
