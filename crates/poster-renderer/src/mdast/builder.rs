//! Tree building from pulldown-cmark events.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag};

use super::{Align, Directive, Image, MdNode};
use crate::directive::{Marker, parse_marker};

/// Parser options: GFM tables, strikethrough, task lists, footnotes, math.
///
/// Literal autolinks are not a pulldown-cmark option; see `autolink`.
fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_MATH
}

/// Node under construction.
#[derive(Debug)]
enum Pending {
    Paragraph,
    Heading(u8),
    BlockQuote,
    CodeBlock(Option<String>),
    HtmlBlock,
    List(Option<u64>),
    Item,
    FootnoteDefinition(String),
    Table(Vec<Align>),
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String, title: String },
    Image { url: String, title: String },
    Directive(String),
    /// Tag without a node of its own; children move to the parent.
    Transparent,
}

impl Pending {
    fn collects_text(&self) -> bool {
        matches!(self, Self::CodeBlock(_) | Self::HtmlBlock)
    }
}

#[derive(Debug)]
struct Frame {
    pending: Pending,
    children: Vec<MdNode>,
    /// Raw text for code and HTML blocks.
    text: String,
    /// Task list state for items.
    checked: Option<bool>,
}

impl Frame {
    fn new(pending: Pending) -> Self {
        Self {
            pending,
            children: Vec::new(),
            text: String::new(),
            checked: None,
        }
    }
}

struct TreeBuilder {
    root: Vec<MdNode>,
    stack: Vec<Frame>,
    warnings: Vec<String>,
}

/// Build a tree from preprocessed Markdown.
pub(super) fn build(source: &str) -> (Vec<MdNode>, Vec<String>) {
    let mut builder = TreeBuilder {
        root: Vec::new(),
        stack: Vec::new(),
        warnings: Vec::new(),
    };
    for event in Parser::new_ext(source, parser_options()) {
        builder.event(event);
    }
    builder.finish()
}

impl TreeBuilder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push(MdNode::InlineCode(code.into_string())),
            Event::InlineMath(math) => self.push(MdNode::InlineMath(math.into_string())),
            Event::DisplayMath(math) => self.push(MdNode::DisplayMath(math.into_string())),
            Event::Html(html) => self.html(&html),
            Event::InlineHtml(html) => self.push(MdNode::Html(html.into_string())),
            Event::FootnoteReference(label) => {
                self.push(MdNode::FootnoteReference(label.into_string()));
            }
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.push(MdNode::Break),
            Event::Rule => self.push(MdNode::ThematicBreak),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let pending = match tag {
            Tag::Paragraph => Pending::Paragraph,
            Tag::Heading { level, .. } => Pending::Heading(heading_level_to_num(level)),
            Tag::BlockQuote(_) => Pending::BlockQuote,
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_owned)
                    }
                    CodeBlockKind::Indented => None,
                };
                Pending::CodeBlock(lang)
            }
            Tag::HtmlBlock => Pending::HtmlBlock,
            Tag::List(start) => Pending::List(start),
            Tag::Item => Pending::Item,
            Tag::FootnoteDefinition(label) => Pending::FootnoteDefinition(label.into_string()),
            Tag::Table(alignments) => {
                Pending::Table(alignments.into_iter().map(Align::from).collect())
            }
            Tag::TableHead => Pending::TableHead,
            Tag::TableRow => Pending::TableRow,
            Tag::TableCell => Pending::TableCell,
            Tag::Emphasis => Pending::Emphasis,
            Tag::Strong => Pending::Strong,
            Tag::Strikethrough => Pending::Strikethrough,
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let url = if link_type == LinkType::Email {
                    format!("mailto:{dest_url}")
                } else {
                    dest_url.into_string()
                };
                Pending::Link {
                    url,
                    title: title.into_string(),
                }
            }
            Tag::Image {
                dest_url, title, ..
            } => Pending::Image {
                url: dest_url.into_string(),
                title: title.into_string(),
            },
            Tag::Superscript
            | Tag::Subscript
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::MetadataBlock(_) => Pending::Transparent,
        };
        self.stack.push(Frame::new(pending));
    }

    fn end(&mut self) {
        // Directive frames only close on their markers; anything still open
        // when an enclosing tag ends is closed here.
        while self
            .stack
            .last()
            .is_some_and(|f| matches!(f.pending, Pending::Directive(_)))
        {
            self.close_directive();
        }

        let Some(frame) = self.stack.pop() else {
            return;
        };

        match frame.pending {
            Pending::HtmlBlock => self.html_block(&frame.text),
            Pending::Transparent => {
                for child in frame.children {
                    self.push(child);
                }
            }
            pending => {
                let node = finish_node(pending, frame.children, frame.text, frame.checked);
                self.push(node);
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(frame) = self.stack.last_mut()
            && frame.pending.collects_text()
        {
            frame.text.push_str(text);
            return;
        }
        self.push(MdNode::Text(text.to_owned()));
    }

    fn html(&mut self, html: &str) {
        if let Some(frame) = self.stack.last_mut()
            && frame.pending.collects_text()
        {
            frame.text.push_str(html);
            return;
        }
        self.push(MdNode::Html(html.to_owned()));
    }

    fn html_block(&mut self, html: &str) {
        match parse_marker(html) {
            Some(Marker::Open(name)) => self.stack.push(Frame::new(Pending::Directive(name))),
            Some(Marker::Close) => {
                if self
                    .stack
                    .last()
                    .is_some_and(|f| matches!(f.pending, Pending::Directive(_)))
                {
                    self.close_directive();
                } else {
                    self.warnings
                        .push("directive close marker outside a directive".to_owned());
                }
            }
            None => self.push(MdNode::Html(html.to_owned())),
        }
    }

    fn close_directive(&mut self) {
        if let Some(Frame {
            pending: Pending::Directive(name),
            children,
            ..
        }) = self.stack.pop()
        {
            self.push(MdNode::ContainerDirective(Directive::new(name, children)));
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        if let Some(item) = self
            .stack
            .iter_mut()
            .rev()
            .find(|f| matches!(f.pending, Pending::Item))
        {
            item.checked = Some(checked);
        }
    }

    /// Append a node to the innermost open frame, merging adjacent text.
    fn push(&mut self, node: MdNode) {
        let children = match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        };
        if let MdNode::Text(text) = &node
            && let Some(MdNode::Text(last)) = children.last_mut()
        {
            last.push_str(text);
            return;
        }
        children.push(node);
    }

    fn finish(mut self) -> (Vec<MdNode>, Vec<String>) {
        while !self.stack.is_empty() {
            self.end();
        }
        (self.root, self.warnings)
    }
}

fn finish_node(
    pending: Pending,
    children: Vec<MdNode>,
    text: String,
    checked: Option<bool>,
) -> MdNode {
    match pending {
        Pending::Paragraph => paragraph(children),
        Pending::Heading(level) => MdNode::Heading { level, children },
        Pending::BlockQuote => MdNode::BlockQuote(children),
        Pending::CodeBlock(lang) => MdNode::Code { lang, value: text },
        Pending::List(start) => MdNode::List { start, children },
        Pending::Item => MdNode::ListItem { checked, children },
        Pending::FootnoteDefinition(label) => MdNode::FootnoteDefinition { label, children },
        Pending::Table(align) => MdNode::Table { align, children },
        Pending::TableHead => MdNode::TableRow {
            head: true,
            children,
        },
        Pending::TableRow => MdNode::TableRow {
            head: false,
            children,
        },
        Pending::TableCell => MdNode::TableCell(children),
        Pending::Emphasis => MdNode::Emphasis(children),
        Pending::Strong => MdNode::Strong(children),
        Pending::Strikethrough => MdNode::Delete(children),
        Pending::Link { url, title } => MdNode::Link {
            url,
            title,
            children,
        },
        Pending::Image { url, title } => MdNode::Image(Image {
            url,
            title,
            alt: children.iter().map(MdNode::plain_text).collect(),
            width: None,
            height: None,
        }),
        Pending::Directive(name) => MdNode::ContainerDirective(Directive::new(name, children)),
        Pending::HtmlBlock => MdNode::Html(text),
        Pending::Transparent => MdNode::Paragraph(children),
    }
}

/// A paragraph holding only `$$…$$` is a display math block.
fn paragraph(children: Vec<MdNode>) -> MdNode {
    let mut significant = children
        .iter()
        .filter(|c| !matches!(c, MdNode::Text(t) if t.trim().is_empty()));
    if let (Some(MdNode::DisplayMath(math)), None) = (significant.next(), significant.next()) {
        return MdNode::Math(math.trim_matches('\n').to_owned());
    }
    MdNode::Paragraph(children)
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdast::parse;
    use pretty_assertions::assert_eq;

    fn text(value: &str) -> MdNode {
        MdNode::Text(value.to_owned())
    }

    fn blocks(markdown: &str) -> Vec<MdNode> {
        parse(markdown).children
    }

    #[test]
    fn test_paragraph_merges_soft_breaks() {
        assert_eq!(
            blocks("a\nb"),
            vec![MdNode::Paragraph(vec![text("a\nb")])]
        );
    }

    #[test]
    fn test_heading() {
        assert_eq!(
            blocks("## Intro"),
            vec![MdNode::Heading {
                level: 2,
                children: vec![text("Intro")],
            }]
        );
    }

    #[test]
    fn test_image_alt_from_children() {
        let nodes = blocks("![a *b*](x.png \"T\")");
        let MdNode::Paragraph(children) = &nodes[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            children[0],
            MdNode::Image(Image {
                url: "x.png".to_owned(),
                title: "T".to_owned(),
                alt: "a b".to_owned(),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_image_followed_by_marker_text() {
        let nodes = blocks("![a](x.png){width=300}");
        let MdNode::Paragraph(children) = &nodes[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(children[1], text("{width=300}"));
    }

    #[test]
    fn test_bare_url_becomes_link() {
        assert_eq!(
            blocks("Visit https://example.com now"),
            vec![MdNode::Paragraph(vec![
                text("Visit "),
                MdNode::Link {
                    url: "https://example.com".to_owned(),
                    title: String::new(),
                    children: vec![text("https://example.com")],
                },
                text(" now"),
            ])]
        );
    }

    #[test]
    fn test_url_in_code_stays_literal() {
        assert_eq!(
            blocks("`https://example.com`"),
            vec![MdNode::Paragraph(vec![MdNode::InlineCode(
                "https://example.com".to_owned()
            )])]
        );
    }

    #[test]
    fn test_code_block() {
        assert_eq!(
            blocks("```rust title=x\nfn x() {}\n```"),
            vec![MdNode::Code {
                lang: Some("rust".to_owned()),
                value: "fn x() {}\n".to_owned(),
            }]
        );
    }

    #[test]
    fn test_task_list() {
        let nodes = blocks("- [x] done\n- [ ] todo\n- plain");
        let MdNode::List { start, children } = &nodes[0] else {
            panic!("expected list");
        };
        assert_eq!(*start, None);
        let checked: Vec<_> = children
            .iter()
            .map(|item| match item {
                MdNode::ListItem { checked, .. } => *checked,
                _ => panic!("expected item"),
            })
            .collect();
        assert_eq!(checked, vec![Some(true), Some(false), None]);
    }

    #[test]
    fn test_table() {
        let nodes = blocks("| a | b |\n|:--|--:|\n| 1 | 2 |");
        let MdNode::Table { align, children } = &nodes[0] else {
            panic!("expected table");
        };
        assert_eq!(align, &vec![Align::Left, Align::Right]);
        assert_eq!(children.len(), 2);
        assert!(matches!(children[0], MdNode::TableRow { head: true, .. }));
        assert!(matches!(children[1], MdNode::TableRow { head: false, .. }));
    }

    #[test]
    fn test_footnote() {
        let nodes = blocks("Hi[^n]\n\n[^n]: Note");
        assert_eq!(
            nodes[0],
            MdNode::Paragraph(vec![text("Hi"), MdNode::FootnoteReference("n".to_owned())])
        );
        assert_eq!(
            nodes[1],
            MdNode::FootnoteDefinition {
                label: "n".to_owned(),
                children: vec![MdNode::Paragraph(vec![text("Note")])],
            }
        );
    }

    #[test]
    fn test_math() {
        assert_eq!(
            blocks("$a^2$"),
            vec![MdNode::Paragraph(vec![MdNode::InlineMath("a^2".to_owned())])]
        );
        assert_eq!(blocks("$$x$$"), vec![MdNode::Math("x".to_owned())]);
    }

    #[test]
    fn test_raw_html_is_kept_as_html_node() {
        let nodes = blocks("<div>x</div>");
        assert!(matches!(nodes[0], MdNode::Html(_)));
    }

    #[test]
    fn test_directive_nesting() {
        let doc = parse("::::row\n:::column\nA\n:::\n:::column\nB\n:::\n::::");
        assert!(doc.warnings.is_empty());
        let MdNode::ContainerDirective(row) = &doc.children[0] else {
            panic!("expected row");
        };
        assert_eq!(row.name, "row");
        assert_eq!(row.children.len(), 2);
        let MdNode::ContainerDirective(column) = &row.children[1] else {
            panic!("expected column");
        };
        assert_eq!(column.children, vec![MdNode::Paragraph(vec![text("B")])]);
    }

    #[test]
    fn test_directive_label_is_leading_paragraph() {
        let doc = parse(":::column[Left side]\nBody\n:::");
        let MdNode::ContainerDirective(column) = &doc.children[0] else {
            panic!("expected column");
        };
        assert_eq!(
            column.children,
            vec![
                MdNode::Paragraph(vec![text("Left side")]),
                MdNode::Paragraph(vec![text("Body")]),
            ]
        );
    }

    #[test]
    fn test_unclosed_directive_wraps_rest() {
        let doc = parse("Before\n\n:::row\nInside");
        assert_eq!(doc.children.len(), 2);
        assert!(matches!(doc.children[1], MdNode::ContainerDirective(_)));
        assert_eq!(doc.warnings.len(), 1);
    }

    #[test]
    fn test_directive_in_code_is_literal() {
        let nodes = blocks("```\n:::row\n```");
        assert_eq!(
            nodes,
            vec![MdNode::Code {
                lang: None,
                value: ":::row\n".to_owned(),
            }]
        );
    }
}
