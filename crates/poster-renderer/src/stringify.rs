//! HTML serialization.

use crate::hast::{Element, Node};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Attributes written bare when their value is empty.
const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "checked",
    "crossorigin",
    "data-footnote-backref",
    "data-footnote-ref",
    "data-footnotes",
    "disabled",
    "hidden",
    "itemscope",
    "open",
];

/// Elements whose text content is written unescaped.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Serialize nodes to HTML.
///
/// ```
/// use poster_renderer::{Element, Node, to_html};
///
/// let p = Element::new("p").with_child(Node::text("a < b"));
/// assert_eq!(to_html(&[p.into()]), "<p>a &#x3C; b</p>");
/// ```
#[must_use]
pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::with_capacity(4096);
    for node in nodes {
        write_node(node, false, &mut out);
    }
    out
}

fn write_node(node: &Node, raw_text: bool, out: &mut String) {
    match node {
        Node::Element(element) => write_element(element, out),
        Node::Text(value) if raw_text => out.push_str(&value.replace("</", "<\\/")),
        Node::Text(value) => escape_text(value, out),
        Node::Comment(value) => {
            out.push_str("<!--");
            out.push_str(value);
            out.push_str("-->");
        }
        Node::Doctype => out.push_str("<!doctype html>"),
        Node::Raw(value) => out.push_str(value),
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        if value.is_empty() && BOOLEAN_ATTRIBUTES.contains(&name.as_str()) {
            continue;
        }
        out.push_str("=\"");
        escape_attr(value, out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        return;
    }

    let raw_text = RAW_TEXT_ELEMENTS.contains(&element.tag.as_str());
    for child in &element.children {
        write_node(child, raw_text, out);
    }

    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

fn escape_text(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&#x26;"),
            '<' => out.push_str("&#x3C;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&#x26;"),
            '"' => out.push_str("&#x22;"),
            _ => out.push(c),
        }
    }
}
