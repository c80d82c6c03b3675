//! HTML document skeleton and style injection.

use poster_meta::build_poster_style;

use crate::hast::{Element, Node, find_mut};

/// Noto font families used by the poster stylesheet.
pub const DEFAULT_FONT_STYLESHEET: &str = "https://fonts.googleapis.com/css2?family=Noto+Color+Emoji&family=Noto+Sans+JP:wght@100..900&family=Noto+Sans+Math&family=Noto+Sans+Mono:wght@100..900&family=Noto+Sans:ital,wght@0,100..900;1,100..900&display=swap";

/// A `<link rel="preconnect">` hint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preconnect {
    pub href: String,
    pub crossorigin: bool,
}

impl Preconnect {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            crossorigin: false,
        }
    }

    #[must_use]
    pub fn with_crossorigin(mut self) -> Self {
        self.crossorigin = true;
        self
    }

    /// Google Fonts origins.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("https://fonts.googleapis.com"),
            Self::new("https://fonts.gstatic.com").with_crossorigin(),
        ]
    }
}

/// Options for [`build_document`].
#[derive(Clone, Debug)]
pub struct DocumentOptions {
    /// `lang` attribute of `<html>`.
    pub language: String,
    /// Contents of `<title>`, omitted when `None`.
    pub title: Option<String>,
    /// The poster `<style>` placeholder, later replaced by [`inject_style`].
    pub style: String,
    pub preconnect: Vec<Preconnect>,
    /// External stylesheet URLs.
    pub stylesheets: Vec<String>,
    /// Further `<style>` blocks after the stylesheets (highlight theme).
    pub extra_styles: Vec<String>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            language: "ja".to_owned(),
            title: None,
            style: build_poster_style(None),
            preconnect: Preconnect::defaults(),
            stylesheets: vec![DEFAULT_FONT_STYLESHEET.to_owned()],
            extra_styles: Vec::new(),
        }
    }
}

/// Wrap body content in a full HTML document.
///
/// The head holds, in order: charset, title, viewport, preconnect links, the
/// poster style, stylesheet links and any extra styles.
#[must_use]
pub fn build_document(body: Vec<Node>, options: &DocumentOptions) -> Vec<Node> {
    let mut head = vec![Element::new("meta").with_attr("charset", "utf-8")];
    if let Some(title) = &options.title {
        head.push(Element::new("title").with_child(Node::text(title.as_str())));
    }
    head.push(
        Element::new("meta")
            .with_attr("name", "viewport")
            .with_attr("content", "width=device-width, initial-scale=1"),
    );
    for preconnect in &options.preconnect {
        let mut link = Element::new("link")
            .with_attr("rel", "preconnect")
            .with_attr("href", preconnect.href.as_str());
        if preconnect.crossorigin {
            link.set_attr("crossorigin", "");
        }
        head.push(link);
    }
    head.push(style_element(&options.style));
    for href in &options.stylesheets {
        head.push(
            Element::new("link")
                .with_attr("rel", "stylesheet")
                .with_attr("href", href.as_str()),
        );
    }
    for css in &options.extra_styles {
        head.push(style_element(css));
    }

    let head = Element::new("head").with_children(lines(head.into_iter().map(Node::from)));
    let body = Element::new("body").with_children(padded(body));
    let html = Element::new("html")
        .with_attr("lang", options.language.as_str())
        .with_children(lines([Node::from(head), Node::from(body)]));

    vec![Node::Doctype, Node::newline(), html.into(), Node::newline()]
}

/// Replace the contents of the first `<style>` in the head.
///
/// Returns `false`, leaving the tree unchanged, when there is no
/// `html > head > style`.
pub fn inject_style(document: &mut [Node], css: &str) -> bool {
    let style = find_mut(document, "html")
        .and_then(|html| html.find_child_mut("head"))
        .and_then(|head| head.find_child_mut("style"));
    match style {
        Some(style) => {
            style.children = vec![Node::text(css)];
            true
        }
        None => {
            tracing::debug!("No style element to inject into");
            false
        }
    }
}

/// Body content between a leading and trailing newline.
fn padded(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len() + 2);
    out.push(Node::newline());
    if !nodes.is_empty() {
        out.extend(nodes);
        out.push(Node::newline());
    }
    out
}

fn style_element(css: &str) -> Element {
    Element::new("style").with_child(Node::text(css))
}

/// Each node on its own line, with a leading and trailing newline.
fn lines(nodes: impl IntoIterator<Item = Node>) -> Vec<Node> {
    let mut out = Vec::new();
    for node in nodes {
        out.push(Node::newline());
        out.push(node);
    }
    if !out.is_empty() {
        out.push(Node::newline());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stringify::to_html;
    use pretty_assertions::assert_eq;

    fn minimal() -> DocumentOptions {
        DocumentOptions {
            language: "en".to_owned(),
            title: Some("Demo".to_owned()),
            style: "p{}".to_owned(),
            preconnect: vec![Preconnect::new("https://a.test").with_crossorigin()],
            stylesheets: vec!["https://a.test/x.css".to_owned()],
            extra_styles: vec![".hl{}".to_owned()],
        }
    }

    #[test]
    fn test_document_layout() {
        let body = vec![Element::new("p").with_child(Node::text("hi")).into()];
        assert_eq!(
            to_html(&build_document(body, &minimal())),
            "<!doctype html>\n<html lang=\"en\">\n<head>\n\
             <meta charset=\"utf-8\">\n\
             <title>Demo</title>\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <link rel=\"preconnect\" href=\"https://a.test\" crossorigin>\n\
             <style>p{}</style>\n\
             <link rel=\"stylesheet\" href=\"https://a.test/x.css\">\n\
             <style>.hl{}</style>\n\
             </head>\n<body>\n<p>hi</p>\n</body>\n</html>\n"
        );
    }

    #[test]
    fn test_body_keeps_fragment_spacing() {
        let body = vec![
            Element::new("p").with_child(Node::text("a")).into(),
            Node::newline(),
            Element::new("p").with_child(Node::text("b")).into(),
        ];
        let html = to_html(&build_document(body, &minimal()));
        assert!(html.ends_with("<body>\n<p>a</p>\n<p>b</p>\n</body>\n</html>\n"));
    }

    #[test]
    fn test_empty_body() {
        let html = to_html(&build_document(Vec::new(), &minimal()));
        assert!(html.ends_with("<body>\n</body>\n</html>\n"));
    }

    #[test]
    fn test_default_options() {
        let options = DocumentOptions::default();
        assert_eq!(options.language, "ja");
        assert_eq!(options.stylesheets, vec![DEFAULT_FONT_STYLESHEET.to_owned()]);
        assert_eq!(options.preconnect.len(), 2);
        assert!(options.preconnect[1].crossorigin);
        assert!(options.style.starts_with(":root {"));
    }

    #[test]
    fn test_no_title_element_without_title() {
        let options = DocumentOptions {
            title: None,
            ..minimal()
        };
        assert!(!to_html(&build_document(Vec::new(), &options)).contains("<title>"));
    }

    #[test]
    fn test_inject_style_replaces_first_style() {
        let mut doc = build_document(Vec::new(), &minimal());
        assert!(inject_style(&mut doc, "body{}"));
        let html = to_html(&doc);
        assert!(html.contains("<style>body{}</style>"));
        assert!(html.contains("<style>.hl{}</style>"));
        assert!(!html.contains("p{}"));
    }

    #[test]
    fn test_inject_style_without_head_is_noop() {
        let mut nodes = vec![Element::new("p").into()];
        let before = nodes.clone();
        assert!(!inject_style(&mut nodes, "x"));
        assert_eq!(nodes, before);
    }
}
