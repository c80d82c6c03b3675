//! Markdown syntax tree.
//!
//! One variant per node kind, built from pulldown-cmark events by
//! [`parse`]. Container directives are first-class nodes.

mod autolink;
mod builder;

use crate::directive::{DirectivePreprocessor, DirectiveMarkup};

/// A node in the Markdown tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MdNode {
    // Blocks
    Paragraph(Vec<MdNode>),
    Heading {
        level: u8,
        children: Vec<MdNode>,
    },
    BlockQuote(Vec<MdNode>),
    List {
        /// Start number for ordered lists, `None` for bullet lists.
        start: Option<u64>,
        children: Vec<MdNode>,
    },
    ListItem {
        /// Task list state, `None` for plain items.
        checked: Option<bool>,
        children: Vec<MdNode>,
    },
    Code {
        lang: Option<String>,
        value: String,
    },
    /// Display math block.
    Math(String),
    /// Raw HTML (block or inline). Never rendered.
    Html(String),
    ThematicBreak,
    Table {
        align: Vec<Align>,
        /// Rows; the first is the header row.
        children: Vec<MdNode>,
    },
    TableRow {
        head: bool,
        children: Vec<MdNode>,
    },
    TableCell(Vec<MdNode>),
    FootnoteDefinition {
        label: String,
        children: Vec<MdNode>,
    },
    ContainerDirective(Directive),

    // Inlines
    Text(String),
    Emphasis(Vec<MdNode>),
    Strong(Vec<MdNode>),
    Delete(Vec<MdNode>),
    Link {
        url: String,
        title: String,
        children: Vec<MdNode>,
    },
    Image(Image),
    InlineCode(String),
    InlineMath(String),
    /// `$$…$$` inside running text.
    DisplayMath(String),
    Break,
    FootnoteReference(String),
}

impl MdNode {
    /// Child nodes of container variants.
    #[must_use]
    pub fn children(&self) -> Option<&[MdNode]> {
        match self {
            Self::Paragraph(children)
            | Self::BlockQuote(children)
            | Self::TableCell(children)
            | Self::Emphasis(children)
            | Self::Strong(children)
            | Self::Delete(children)
            | Self::Heading { children, .. }
            | Self::List { children, .. }
            | Self::ListItem { children, .. }
            | Self::Table { children, .. }
            | Self::TableRow { children, .. }
            | Self::FootnoteDefinition { children, .. }
            | Self::Link { children, .. }
            | Self::ContainerDirective(Directive { children, .. }) => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<MdNode>> {
        match self {
            Self::Paragraph(children)
            | Self::BlockQuote(children)
            | Self::TableCell(children)
            | Self::Emphasis(children)
            | Self::Strong(children)
            | Self::Delete(children)
            | Self::Heading { children, .. }
            | Self::List { children, .. }
            | Self::ListItem { children, .. }
            | Self::Table { children, .. }
            | Self::TableRow { children, .. }
            | Self::FootnoteDefinition { children, .. }
            | Self::Link { children, .. }
            | Self::ContainerDirective(Directive { children, .. }) => Some(children),
            _ => None,
        }
    }

    /// Plain text of this node, as used for image alt text.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(value)
            | Self::InlineCode(value)
            | Self::InlineMath(value)
            | Self::DisplayMath(value) => out.push_str(value),
            Self::Image(image) => out.push_str(&image.alt),
            Self::Break => out.push('\n'),
            _ => {
                for child in self.children().unwrap_or_default() {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Table column alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Align {
    /// Value of the `align` attribute, if any.
    #[must_use]
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Left => Some("left"),
            Self::Center => Some("center"),
            Self::Right => Some("right"),
        }
    }
}

impl From<pulldown_cmark::Alignment> for Align {
    fn from(alignment: pulldown_cmark::Alignment) -> Self {
        match alignment {
            pulldown_cmark::Alignment::None => Self::None,
            pulldown_cmark::Alignment::Left => Self::Left,
            pulldown_cmark::Alignment::Center => Self::Center,
            pulldown_cmark::Alignment::Right => Self::Right,
        }
    }
}

/// An image with optional size hints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    pub title: String,
    pub alt: String,
    pub width: Option<String>,
    pub height: Option<String>,
}

/// A container directive and the markup it maps to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    /// Set by [`crate::map_directives`].
    pub markup: Option<DirectiveMarkup>,
    pub children: Vec<MdNode>,
}

impl Directive {
    pub fn new(name: impl Into<String>, children: Vec<MdNode>) -> Self {
        Self {
            name: name.into(),
            markup: None,
            children,
        }
    }
}

/// Parsed Markdown body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MdDocument {
    pub children: Vec<MdNode>,
    /// Directive problems (unclosed or stray fences).
    pub warnings: Vec<String>,
}

/// Parse a Markdown body (without frontmatter) into a tree.
///
/// GFM tables, strikethrough, task lists, footnotes, literal autolinks and
/// `$` math are enabled. Container directives become [`MdNode::ContainerDirective`].
///
/// ```
/// use poster_renderer::{MdNode, parse};
///
/// let doc = parse(":::row\nHello\n:::");
/// let MdNode::ContainerDirective(row) = &doc.children[0] else { panic!() };
/// assert_eq!(row.name, "row");
/// assert_eq!(row.children, vec![MdNode::Paragraph(vec![MdNode::Text("Hello".into())])]);
/// ```
#[must_use]
pub fn parse(markdown: &str) -> MdDocument {
    let mut preprocessor = DirectivePreprocessor::new();
    let source = preprocessor.process(markdown);
    let mut warnings = preprocessor.take_warnings();

    let (mut children, builder_warnings) = builder::build(&source);
    warnings.extend(builder_warnings);
    autolink::link_literals(&mut children);

    MdDocument { children, warnings }
}
