//! Container directives (`:::name` … `:::`).
//!
//! Directives are handled in two phases:
//!
//! 1. **Preprocessing**: fences are rewritten into marker comments before
//!    Markdown parsing (see [`crate::mdast::parse`]).
//! 2. **Mapping** ([`map_directives`]): each directive node in the MD-AST is
//!    given the element and class it renders as.
//!
//! | Directive | Renders as |
//! |-----------|------------|
//! | `row` | `<div class="poster-content-row">` |
//! | `column` | `<div class="poster-content-column">` |
//! | anything else | `<div>` |

mod fence;
mod parser;
mod preprocess;

pub(crate) use preprocess::{DirectivePreprocessor, Marker, parse_marker};

use crate::mdast::MdNode;

/// Directive name to class name.
const DIRECTIVE_CLASSES: &[(&str, &str)] = &[
    ("row", "poster-content-row"),
    ("column", "poster-content-column"),
];

/// Element a directive renders as.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectiveMarkup {
    pub tag: &'static str,
    pub class: Option<&'static str>,
}

impl DirectiveMarkup {
    /// Markup for a directive name.
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        let class = DIRECTIVE_CLASSES
            .iter()
            .find(|(directive, _)| *directive == name)
            .map(|(_, class)| *class);
        Self { tag: "div", class }
    }
}

/// Assign markup to every container directive in the tree.
pub fn map_directives(nodes: &mut [MdNode]) {
    for node in nodes {
        if let MdNode::ContainerDirective(directive) = node {
            directive.markup = Some(DirectiveMarkup::for_name(&directive.name));
        }
        if let Some(children) = node.children_mut() {
            map_directives(children);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdast::Directive;

    #[test]
    fn test_for_name() {
        assert_eq!(
            DirectiveMarkup::for_name("row").class,
            Some("poster-content-row")
        );
        assert_eq!(
            DirectiveMarkup::for_name("column").class,
            Some("poster-content-column")
        );
        assert_eq!(
            DirectiveMarkup::for_name("note"),
            DirectiveMarkup {
                tag: "div",
                class: None
            }
        );
    }

    #[test]
    fn test_map_nested() {
        let inner = MdNode::ContainerDirective(Directive::new("column", Vec::new()));
        let mut nodes = vec![MdNode::ContainerDirective(Directive::new(
            "row",
            vec![inner],
        ))];
        map_directives(&mut nodes);

        let MdNode::ContainerDirective(outer) = &nodes[0] else {
            panic!("expected directive");
        };
        assert_eq!(outer.markup.and_then(|m| m.class), Some("poster-content-row"));
        let MdNode::ContainerDirective(inner) = &outer.children[0] else {
            panic!("expected directive");
        };
        assert_eq!(
            inner.markup.and_then(|m| m.class),
            Some("poster-content-column")
        );
    }
}
