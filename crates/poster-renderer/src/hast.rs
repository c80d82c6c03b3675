//! HTML syntax tree.
//!
//! Elements keep their attributes in insertion order so serialization is
//! deterministic. A boolean attribute is stored with an empty value.

/// A node in the HTML tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    /// `<!doctype html>`.
    Doctype,
    /// Pre-rendered markup emitted verbatim (highlighted code, MathML).
    Raw(String),
}

impl Node {
    /// Create a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Newline text node used between block elements.
    pub(crate) fn newline() -> Self {
        Self::Text("\n".to_owned())
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Check if this is an element with the given tag name.
    #[must_use]
    pub fn is_element(&self, tag: &str) -> bool {
        self.as_element().is_some_and(|e| e.tag == tag)
    }

    /// Check if this is a text node holding only whitespace.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Text(value) if value.trim().is_empty())
    }

    /// Concatenated text of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(value) => out.push_str(value),
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
            Self::Comment(_) | Self::Doctype | Self::Raw(_) => {}
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// An HTML element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes as `(name, value)` pairs in insertion order.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute, replacing any existing value.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Add a class name.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(key, _)| key == name)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name.to_owned(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(index).1)
    }

    /// Class names from the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if class.is_empty() || self.has_class(class) {
            return;
        }
        let value = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_owned(),
        };
        self.set_attr("class", value);
    }

    /// Child elements, skipping text and other nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First child element with the given tag.
    #[must_use]
    pub fn find_child(&self, tag: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.tag == tag)
    }

    pub fn find_child_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|e| e.tag == tag)
    }

    /// Concatenated text of all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

/// Find the first top-level element with the given tag, mutably.
pub(crate) fn find_mut<'a>(nodes: &'a mut [Node], tag: &str) -> Option<&'a mut Element> {
    nodes
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .find(|e| e.tag == tag)
}

/// Join block nodes with newline text nodes.
///
/// When `loose` is set the result also starts and ends with a newline.
pub(crate) fn wrap(nodes: Vec<Node>, loose: bool) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len() * 2 + 1);
    if loose {
        out.push(Node::newline());
    }
    for (i, node) in nodes.into_iter().enumerate() {
        if i > 0 {
            out.push(Node::newline());
        }
        out.push(node);
    }
    if loose && out.len() > 1 {
        out.push(Node::newline());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_helpers() {
        let mut el = Element::new("div").with_class("a");
        el.add_class("b");
        el.add_class("a");
        assert_eq!(el.attr("class"), Some("a b"));
        assert!(el.has_class("b"));
        assert!(!el.has_class("c"));
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut el = Element::new("img").with_attr("src", "a.png");
        el.set_attr("src", "b.png");
        assert_eq!(el.attrs, vec![("src".to_owned(), "b.png".to_owned())]);
        assert_eq!(el.remove_attr("src"), Some("b.png".to_owned()));
        assert!(!el.has_attr("src"));
    }

    #[test]
    fn test_text_content() {
        let el = Element::new("p")
            .with_child(Node::text("a "))
            .with_child(Element::new("em").with_child(Node::text("b")))
            .with_child(Node::Raw("<x>".to_owned()));
        assert_eq!(el.text_content(), "a b");
    }

    #[test]
    fn test_wrap() {
        let nodes = vec![Node::text("a"), Node::text("b")];
        assert_eq!(
            wrap(nodes.clone(), false),
            vec![Node::text("a"), Node::newline(), Node::text("b")]
        );
        assert_eq!(wrap(nodes, true).len(), 5);
        assert_eq!(wrap(Vec::new(), true), vec![Node::newline()]);
    }
}
