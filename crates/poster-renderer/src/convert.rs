//! MD-AST to HTML tree conversion.
//!
//! Follows the usual Markdown-to-HTML mapping: block siblings are separated by
//! newline text nodes, tight list items keep their inline content directly,
//! raw HTML is dropped and footnotes are collected into a GitHub-style
//! section at the end.

use std::collections::HashMap;
use std::fmt::Write;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::directive::DirectiveMarkup;
use crate::hast::{Element, Node, wrap};
use crate::mdast::{Align, Image, MdNode};

/// Prefix for footnote ids, matching what the sanitizer applies to other ids.
const CLOBBER_PREFIX: &str = "user-content-";

/// Characters kept as-is in footnote ids.
const ID_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Convert Markdown nodes to HTML nodes.
///
/// `footnote_label` is the heading text of the footnote section, which is
/// only emitted when at least one footnote is referenced.
#[must_use]
pub fn to_hast(nodes: &[MdNode], footnote_label: &str) -> Vec<Node> {
    let mut converter = Converter::new(nodes);
    let mut out = wrap(converter.all(nodes), false);
    if let Some(footer) = converter.footer(footnote_label) {
        out.push(Node::newline());
        out.push(footer.into());
    }
    out
}

struct Converter<'a> {
    /// Footnote definitions by normalized label.
    definitions: HashMap<String, &'a [MdNode]>,
    /// Referenced labels in first-reference order.
    order: Vec<String>,
    /// Number of references seen per label.
    counts: HashMap<String, usize>,
}

impl<'a> Converter<'a> {
    fn new(nodes: &'a [MdNode]) -> Self {
        let mut definitions = HashMap::new();
        collect_definitions(nodes, &mut definitions);
        Self {
            definitions,
            order: Vec::new(),
            counts: HashMap::new(),
        }
    }

    fn all(&mut self, nodes: &[MdNode]) -> Vec<Node> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            self.one(node, &mut out);
        }
        out
    }

    #[allow(clippy::too_many_lines)]
    fn one(&mut self, node: &MdNode, out: &mut Vec<Node>) {
        let element = match node {
            MdNode::Paragraph(children) => Element::new("p").with_children(self.all(children)),
            MdNode::Heading { level, children } => {
                Element::new(format!("h{level}")).with_children(self.all(children))
            }
            MdNode::BlockQuote(children) => {
                Element::new("blockquote").with_children(wrap(self.all(children), true))
            }
            MdNode::List { start, children } => self.list(*start, children),
            MdNode::ListItem { checked, children } => self.list_item(*checked, children, false),
            MdNode::Code { lang, value } => {
                let mut code = Element::new("code");
                if let Some(lang) = lang {
                    code.add_class(&format!("language-{lang}"));
                }
                Element::new("pre").with_child(code.with_child(Node::text(value.as_str())))
            }
            MdNode::Math(value) => Element::new("pre").with_child(math_code(value, "math-display")),
            MdNode::ThematicBreak => Element::new("hr"),
            MdNode::Table { align, children } => self.table(align, children),
            MdNode::TableRow { head, children } => self.table_row(*head, &[], children),
            MdNode::TableCell(children) => Element::new("td").with_children(self.all(children)),
            MdNode::ContainerDirective(directive) => {
                let markup = directive
                    .markup
                    .unwrap_or_else(|| DirectiveMarkup::for_name(&directive.name));
                let mut element = Element::new(markup.tag);
                if let Some(class) = markup.class {
                    element.add_class(class);
                }
                element.with_children(self.all(&directive.children))
            }
            MdNode::Text(value) => {
                out.push(Node::text(value.as_str()));
                return;
            }
            MdNode::Emphasis(children) => Element::new("em").with_children(self.all(children)),
            MdNode::Strong(children) => Element::new("strong").with_children(self.all(children)),
            MdNode::Delete(children) => Element::new("del").with_children(self.all(children)),
            MdNode::Link {
                url,
                title,
                children,
            } => {
                let mut a = Element::new("a").with_attr("href", url.as_str());
                if !title.is_empty() {
                    a.set_attr("title", title.as_str());
                }
                a.with_children(self.all(children))
            }
            MdNode::Image(image) => image_element(image),
            MdNode::InlineCode(value) => Element::new("code").with_child(Node::text(value.as_str())),
            MdNode::InlineMath(value) => math_code(value, "math-inline"),
            MdNode::DisplayMath(value) => math_code(value, "math-display"),
            MdNode::Break => {
                out.push(Element::new("br").into());
                out.push(Node::newline());
                return;
            }
            MdNode::FootnoteReference(label) => match self.reference(label) {
                Some(sup) => sup,
                None => {
                    out.push(Node::text(format!("[^{label}]")));
                    return;
                }
            },
            MdNode::Html(_) | MdNode::FootnoteDefinition { .. } => return,
        };
        out.push(element.into());
    }

    fn list(&mut self, start: Option<u64>, items: &[MdNode]) -> Element {
        let mut list = match start {
            Some(1) => Element::new("ol"),
            Some(n) => Element::new("ol").with_attr("start", n.to_string()),
            None => Element::new("ul"),
        };

        let loose = items.iter().any(|item| {
            item.children()
                .is_some_and(|c| c.iter().any(|n| matches!(n, MdNode::Paragraph(_))))
        });
        let is_task_list = items
            .iter()
            .any(|item| matches!(item, MdNode::ListItem { checked: Some(_), .. }));
        if is_task_list {
            list.add_class("contains-task-list");
        }

        let mut converted = Vec::with_capacity(items.len());
        for item in items {
            match item {
                MdNode::ListItem { checked, children } => {
                    converted.push(self.list_item(*checked, children, loose).into());
                }
                other => self.one(other, &mut converted),
            }
        }
        list.with_children(wrap(converted, true))
    }

    fn list_item(&mut self, checked: Option<bool>, children: &[MdNode], loose: bool) -> Element {
        let mut li = Element::new("li");
        let mut content = self.all(children);

        if let Some(checked) = checked {
            li.add_class("task-list-item");
            let mut input = Element::new("input").with_attr("type", "checkbox");
            if checked {
                input.set_attr("checked", "");
            }
            input.set_attr("disabled", "");

            match content.first_mut() {
                Some(Node::Element(p)) if p.tag == "p" => prepend_checkbox(&mut p.children, input),
                _ => prepend_checkbox(&mut content, input),
            }
        }

        li.with_children(if loose { wrap(content, true) } else { content })
    }

    fn table(&mut self, align: &[Align], rows: &[MdNode]) -> Element {
        let mut sections = Vec::with_capacity(2);
        let mut body = Vec::new();

        for (i, row) in rows.iter().enumerate() {
            let MdNode::TableRow { head, children } = row else {
                continue;
            };
            let tr = self.table_row(*head || i == 0, align, children);
            if i == 0 {
                sections.push(Element::new("thead").with_children(wrap(vec![tr.into()], true)));
            } else {
                body.push(tr.into());
            }
        }
        if !body.is_empty() {
            sections.push(Element::new("tbody").with_children(wrap(body, true)));
        }

        let sections = sections.into_iter().map(Node::from).collect();
        Element::new("table").with_children(wrap(sections, true))
    }

    fn table_row(&mut self, head: bool, align: &[Align], cells: &[MdNode]) -> Element {
        let tag = if head { "th" } else { "td" };
        let mut converted = Vec::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            let children = match cell {
                MdNode::TableCell(children) => self.all(children),
                other => self.all(std::slice::from_ref(other)),
            };
            let mut element = Element::new(tag);
            if let Some(value) = align.get(i).and_then(|a| a.as_attr()) {
                element.set_attr("align", value);
            }
            converted.push(element.with_children(children).into());
        }
        Element::new("tr").with_children(wrap(converted, true))
    }

    /// Footnote reference, or `None` when the label has no definition.
    fn reference(&mut self, label: &str) -> Option<Element> {
        let key = normalize_label(label);
        if !self.definitions.contains_key(&key) {
            return None;
        }

        let index = match self.order.iter().position(|l| *l == key) {
            Some(index) => index,
            None => {
                self.order.push(key.clone());
                self.order.len() - 1
            }
        };
        let count = self.counts.entry(key.clone()).or_insert(0);
        *count += 1;

        let safe_id = safe_id(&key);
        let mut id = format!("{CLOBBER_PREFIX}fnref-{safe_id}");
        if *count > 1 {
            let _ = write!(id, "-{count}");
        }

        let a = Element::new("a")
            .with_attr("href", format!("#{CLOBBER_PREFIX}fn-{safe_id}"))
            .with_attr("id", id)
            .with_attr("data-footnote-ref", "")
            .with_attr("aria-describedby", "footnote-label")
            .with_child(Node::text((index + 1).to_string()));
        Some(Element::new("sup").with_child(a))
    }

    /// Footnote section, or `None` when nothing was referenced.
    fn footer(&mut self, label: &str) -> Option<Element> {
        let mut items = Vec::new();
        let mut index = 0;

        // Definitions may reference further footnotes, growing `order`.
        while index < self.order.len() {
            let key = self.order[index].clone();
            index += 1;
            let Some(children) = self.definitions.get(&key).copied() else {
                continue;
            };

            let mut content = self.all(children);
            let safe_id = safe_id(&key);
            let count = self.counts.get(&key).copied().unwrap_or(1);
            let backrefs = back_references(&safe_id, index, count);

            match content.last_mut() {
                Some(Node::Element(p)) if p.tag == "p" => {
                    match p.children.last_mut() {
                        Some(Node::Text(text)) => text.push(' '),
                        _ => p.children.push(Node::text(" ")),
                    }
                    p.children.extend(backrefs);
                }
                _ => content.extend(backrefs),
            }

            let li = Element::new("li")
                .with_attr("id", format!("{CLOBBER_PREFIX}fn-{safe_id}"))
                .with_children(wrap(content, true));
            items.push(li.into());
        }

        if items.is_empty() {
            return None;
        }

        let heading = Element::new("h2")
            .with_class("sr-only")
            .with_attr("id", "footnote-label")
            .with_child(Node::text(label));
        let section = Element::new("section")
            .with_attr("data-footnotes", "")
            .with_class("footnotes")
            .with_children(vec![
                heading.into(),
                Node::newline(),
                Element::new("ol").with_children(wrap(items, true)).into(),
                Node::newline(),
            ]);
        Some(section)
    }
}

fn prepend_checkbox(target: &mut Vec<Node>, input: Element) {
    if !target.is_empty() {
        target.insert(0, Node::text(" "));
    }
    target.insert(0, input.into());
}

/// Back-reference links for a footnote referenced `count` times.
fn back_references(safe_id: &str, number: usize, count: usize) -> Vec<Node> {
    let mut out = Vec::new();
    for reference in 1..=count.max(1) {
        if !out.is_empty() {
            out.push(Node::text(" "));
        }
        let suffix = if reference > 1 {
            format!("-{reference}")
        } else {
            String::new()
        };
        let mut a = Element::new("a")
            .with_attr("href", format!("#{CLOBBER_PREFIX}fnref-{safe_id}{suffix}"))
            .with_attr("data-footnote-backref", "")
            .with_attr("aria-label", format!("Back to reference {number}{suffix}"))
            .with_class("data-footnote-backref")
            .with_child(Node::text("↩"));
        if reference > 1 {
            a = a.with_child(Element::new("sup").with_child(Node::text(reference.to_string())));
        }
        out.push(a.into());
    }
    out
}

fn collect_definitions<'a>(nodes: &'a [MdNode], out: &mut HashMap<String, &'a [MdNode]>) {
    for node in nodes {
        if let MdNode::FootnoteDefinition { label, children } = node {
            // First definition wins.
            out.entry(normalize_label(label)).or_insert(children.as_slice());
        }
        if let Some(children) = node.children() {
            collect_definitions(children, out);
        }
    }
}

fn normalize_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Percent-encode a footnote label for use in ids and fragments.
fn safe_id(label: &str) -> String {
    utf8_percent_encode(label, ID_ENCODE_SET).to_string()
}

fn math_code(value: &str, class: &str) -> Element {
    Element::new("code")
        .with_class("language-math")
        .with_class(class)
        .with_child(Node::text(value))
}

fn image_element(image: &Image) -> Element {
    let mut img = Element::new("img")
        .with_attr("src", image.url.as_str())
        .with_attr("alt", image.alt.as_str());
    if !image.title.is_empty() {
        img.set_attr("title", image.title.as_str());
    }
    if let Some(width) = &image.width {
        img.set_attr("width", width.as_str());
    }
    if let Some(height) = &image.height {
        img.set_attr("height", height.as_str());
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdast::parse;
    use crate::stringify::to_html;
    use pretty_assertions::assert_eq;

    fn render(markdown: &str) -> String {
        to_html(&to_hast(&parse(markdown).children, "Notes"))
    }

    #[test]
    fn test_blocks_separated_by_newlines() {
        assert_eq!(render("## Intro\n\nHello"), "<h2>Intro</h2>\n<p>Hello</p>");
    }

    #[test]
    fn test_inline_formatting() {
        assert_eq!(
            render("*a* **b** ~~c~~ `d` [e](http://x \"t\")"),
            r#"<p><em>a</em> <strong>b</strong> <del>c</del> <code>d</code> <a href="http://x" title="t">e</a></p>"#
        );
    }

    #[test]
    fn test_hard_break() {
        assert_eq!(render("a  \nb"), "<p>a<br>\nb</p>");
    }

    #[test]
    fn test_code_block() {
        assert_eq!(
            render("```py\nx = 1\n```"),
            "<pre><code class=\"language-py\">x = 1\n</code></pre>"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(render("- a\n- b"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>");
        assert_eq!(
            render("3. a\n4. b"),
            "<ol start=\"3\">\n<li>a</li>\n<li>b</li>\n</ol>"
        );
    }

    #[test]
    fn test_loose_list_keeps_paragraphs() {
        assert_eq!(
            render("- a\n\n- b"),
            "<ul>\n<li>\n<p>a</p>\n</li>\n<li>\n<p>b</p>\n</li>\n</ul>"
        );
    }

    #[test]
    fn test_task_list() {
        assert_eq!(
            render("- [x] done\n- [ ] todo"),
            "<ul class=\"contains-task-list\">\n\
             <li class=\"task-list-item\"><input type=\"checkbox\" checked disabled> done</li>\n\
             <li class=\"task-list-item\"><input type=\"checkbox\" disabled> todo</li>\n\
             </ul>"
        );
    }

    #[test]
    fn test_table_with_alignment() {
        assert_eq!(
            render("| a | b |\n|:-:|---|\n| 1 | 2 |"),
            "<table>\n<thead>\n<tr>\n<th align=\"center\">a</th>\n<th>b</th>\n</tr>\n</thead>\n\
             <tbody>\n<tr>\n<td align=\"center\">1</td>\n<td>2</td>\n</tr>\n</tbody>\n</table>"
        );
    }

    #[test]
    fn test_raw_html_dropped() {
        assert_eq!(render("<script>x</script>\n\ntext <b>bold</b>"), "<p>text bold</p>");
    }

    #[test]
    fn test_math() {
        assert_eq!(
            render("$x$"),
            "<p><code class=\"language-math math-inline\">x</code></p>"
        );
        assert_eq!(
            render("$$\ny\n$$"),
            "<pre><code class=\"language-math math-display\">y</code></pre>"
        );
    }

    #[test]
    fn test_image_hints() {
        let mut nodes = parse("![Chart width:40%](c.png)").children;
        crate::image::annotate_images(&mut nodes);
        assert_eq!(
            to_html(&to_hast(&nodes, "Notes")),
            "<p><img src=\"c.png\" alt=\"Chart\" width=\"40%\"></p>"
        );
    }

    #[test]
    fn test_directive_classes() {
        assert_eq!(
            render(":::row\nA\n:::\n\n:::box\nB\n:::"),
            "<div class=\"poster-content-row\"><p>A</p></div>\n<div><p>B</p></div>"
        );
    }

    #[test]
    fn test_footnotes() {
        let html = render("A[^x] B[^x]\n\n[^x]: Note\n\n[^unused]: Gone");
        assert_eq!(
            html,
            "<p>A<sup><a href=\"#user-content-fn-x\" id=\"user-content-fnref-x\" data-footnote-ref aria-describedby=\"footnote-label\">1</a></sup> \
             B<sup><a href=\"#user-content-fn-x\" id=\"user-content-fnref-x-2\" data-footnote-ref aria-describedby=\"footnote-label\">1</a></sup></p>\n\
             <section data-footnotes class=\"footnotes\"><h2 class=\"sr-only\" id=\"footnote-label\">Notes</h2>\n\
             <ol>\n<li id=\"user-content-fn-x\">\n<p>Note \
             <a href=\"#user-content-fnref-x\" data-footnote-backref aria-label=\"Back to reference 1\" class=\"data-footnote-backref\">↩</a> \
             <a href=\"#user-content-fnref-x-2\" data-footnote-backref aria-label=\"Back to reference 1-2\" class=\"data-footnote-backref\">↩<sup>2</sup></a></p>\n\
             </li>\n</ol>\n</section>"
        );
    }

    #[test]
    fn test_footnotes_numbered_by_first_reference() {
        let html = render("A[^b] B[^a]\n\n[^a]: First\n\n[^b]: Second");
        let b = html.find("fnref-b").unwrap_or(usize::MAX);
        let a = html.find("fnref-a").unwrap_or(usize::MAX);
        assert!(b < a);
        assert!(html.contains("id=\"user-content-fnref-a\" data-footnote-ref aria-describedby=\"footnote-label\">2</a>"));
    }

    #[test]
    fn test_safe_id() {
        assert_eq!(safe_id("note 1"), "note%201");
        assert_eq!(safe_id("a-b_c"), "a-b_c");
        assert_eq!(safe_id("注"), "%E6%B3%A8");
    }
}
