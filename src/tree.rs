//! Ordered tree representation of a parsed XML document.

use indexmap::IndexMap;

/// A node in a parsed XML document: an element or a run of character data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An XML element with ordered attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Attribute values in document order; names are unique.
    pub attributes: IndexMap<String, String>,
    /// Element and text children, interleaved as encountered.
    pub children: Vec<Node>,
}

/// A parsed document. Always has exactly one root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }

    /// Returns the payload when this element's content is exactly one text node.
    pub fn text_only(&self) -> Option<&str> {
        match self.children.as_slice() {
            [Node::Text(text)] => Some(text),
            _ => None,
        }
    }

    /// Short display form: the text payload, or the name and child count.
    pub fn preview(&self, max_len: usize) -> String {
        let preview = match self.text_only() {
            Some(text) => text.to_string(),
            None => {
                let count = self.children.len();
                if count == 0 {
                    format!("<{}/>", self.name)
                } else if count == 1 {
                    format!("<{}> {{ {} child }}", self.name, count)
                } else {
                    format!("<{}> {{ {} children }}", self.name, count)
                }
            }
        };

        truncate(preview, max_len)
    }

    /// Number of scalar leaves: attribute values plus text leaves, recursively.
    pub fn leaf_count(&self) -> usize {
        self.attributes.len() + self.children.iter().map(Node::leaf_count).sum::<usize>()
    }
}

impl Node {
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Element(element) => element.leaf_count(),
            Node::Text(_) => 1,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }
}

pub(crate) fn truncate(value: String, max_len: usize) -> String {
    if value.chars().count() > max_len {
        let kept: String = value.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only() {
        let wrapped = Element::new("a").with_text("x");
        assert_eq!(wrapped.text_only(), Some("x"));

        let with_attr = Element::new("a").with_attribute("k", "v").with_text("x");
        assert_eq!(with_attr.text_only(), Some("x"));

        let nested = Element::new("a").with_child(Element::new("b").with_text("x"));
        assert_eq!(nested.text_only(), None);

        assert_eq!(Element::new("a").text_only(), None);
    }

    #[test]
    fn test_leaf_count_counts_attributes_and_text() {
        let element = Element::new("root")
            .with_attribute("version", "1")
            .with_child(Element::new("id").with_text("1"))
            .with_child(Element::new("empty"))
            .with_child(Element::new("name").with_attribute("lang", "en").with_text("Bob"));
        assert_eq!(element.leaf_count(), 4);
        assert_eq!(Element::new("r").leaf_count(), 0);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let element = Element::new("a").with_text("é".repeat(20));
        let preview = element.preview(8);
        assert_eq!(preview.chars().count(), 8);
        assert!(preview.ends_with("..."));
    }
}
