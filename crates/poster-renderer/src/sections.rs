//! Poster section grouping.
//!
//! Every top-level `<h2>` opens a `div.poster-section`. Nodes following the
//! heading go into that section's `div.poster-content`, created on first use.
//! Nodes before the first heading stay at the top level.

use crate::hast::{Element, Node};

const SECTION_CLASS: &str = "poster-section";
const CONTENT_CLASS: &str = "poster-content";

/// Group top-level nodes into poster sections.
///
/// ```
/// use poster_renderer::{Element, Node, to_html, wrap_sections};
///
/// let nodes = wrap_sections(vec![
///     Element::new("h2").with_child(Node::text("Intro")).into(),
///     Element::new("p").with_child(Node::text("Hello")).into(),
/// ]);
/// assert_eq!(
///     to_html(&nodes),
///     r#"<div class="poster-section"><h2>Intro</h2><div class="poster-content"><p>Hello</p></div></div>"#
/// );
/// ```
#[must_use]
pub fn wrap_sections(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut current: Option<OpenSection> = None;

    for node in nodes {
        if node.is_element("h2") {
            if let Some(section) = current.take() {
                out.push(section.finish().into());
            }
            current = Some(OpenSection {
                heading: node,
                content: None,
            });
            continue;
        }

        match &mut current {
            Some(section) => section
                .content
                .get_or_insert_with(|| Element::new("div").with_class(CONTENT_CLASS))
                .children
                .push(node),
            None => out.push(node),
        }
    }

    if let Some(section) = current {
        out.push(section.finish().into());
    }
    out
}

struct OpenSection {
    heading: Node,
    content: Option<Element>,
}

impl OpenSection {
    fn finish(self) -> Element {
        let section = Element::new("div")
            .with_class(SECTION_CLASS)
            .with_child(self.heading);
        match self.content {
            Some(content) => section.with_child(content),
            None => section,
        }
    }
}
