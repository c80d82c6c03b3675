//! Image paragraphs to figures.

use crate::hast::{Element, Node};

const FIGURE_CLASS: &str = "rehype-figure";
const CONTAINER_CLASS: &str = "rehype-figure-container";

/// Replace image-only paragraphs with `<figure>` elements.
///
/// A paragraph qualifies when it holds at least one `<img>` and nothing else
/// but whitespace. Each image becomes a `figure.rehype-figure` with a
/// `<figcaption>` holding its alt text, unless the alt text is blank. Several
/// figures from one paragraph share a `div.rehype-figure-container`.
pub fn wrap_figures(nodes: &mut [Node]) {
    for node in nodes {
        let Node::Element(element) = node else {
            continue;
        };
        if let Some(replacement) = figures_for(element) {
            *element = replacement;
        } else {
            wrap_figures(&mut element.children);
        }
    }
}

fn figures_for(paragraph: &Element) -> Option<Element> {
    if paragraph.tag != "p" {
        return None;
    }
    let only_images = paragraph
        .children
        .iter()
        .all(|n| n.is_element("img") || n.is_whitespace());
    if !only_images {
        return None;
    }

    let mut figures: Vec<Element> = paragraph
        .child_elements()
        .map(|img| figure(img.clone()))
        .collect();

    match figures.len() {
        0 => None,
        1 => figures.pop(),
        _ => Some(
            Element::new("div")
                .with_class(CONTAINER_CLASS)
                .with_children(figures.into_iter().map(Node::from).collect()),
        ),
    }
}

fn figure(img: Element) -> Element {
    let caption = img
        .attr("alt")
        .filter(|alt| !alt.trim().is_empty())
        .map(|alt| Element::new("figcaption").with_child(Node::text(alt)));
    let figure = Element::new("figure").with_class(FIGURE_CLASS).with_child(img);
    match caption {
        Some(caption) => figure.with_child(caption),
        None => figure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stringify::to_html;
    use pretty_assertions::assert_eq;

    fn img(src: &str, alt: &str) -> Node {
        Element::new("img")
            .with_attr("src", src)
            .with_attr("alt", alt)
            .into()
    }

    fn run(mut nodes: Vec<Node>) -> String {
        wrap_figures(&mut nodes);
        to_html(&nodes)
    }

    #[test]
    fn test_single_image() {
        let p = Element::new("p").with_child(img("a.png", "Chart"));
        assert_eq!(
            run(vec![p.into()]),
            r#"<figure class="rehype-figure"><img src="a.png" alt="Chart"><figcaption>Chart</figcaption></figure>"#
        );
    }

    #[test]
    fn test_blank_alt_has_no_caption() {
        let p = Element::new("p").with_child(img("a.png", " "));
        assert_eq!(
            run(vec![p.into()]),
            r#"<figure class="rehype-figure"><img src="a.png" alt=" "></figure>"#
        );
    }

    #[test]
    fn test_multiple_images_grouped() {
        let p = Element::new("p").with_children(vec![
            img("a.png", "A"),
            Node::text("\n"),
            img("b.png", ""),
        ]);
        assert_eq!(
            run(vec![p.into()]),
            "<div class=\"rehype-figure-container\">\
             <figure class=\"rehype-figure\"><img src=\"a.png\" alt=\"A\"><figcaption>A</figcaption></figure>\
             <figure class=\"rehype-figure\"><img src=\"b.png\" alt=\"\"></figure></div>"
        );
    }

    #[test]
    fn test_mixed_paragraph_untouched() {
        let p = Element::new("p").with_children(vec![Node::text("see "), img("a.png", "A")]);
        let nodes = vec![Node::from(p)];
        assert_eq!(run(nodes.clone()), to_html(&nodes));
    }

    #[test]
    fn test_nested_paragraphs() {
        let div = Element::new("div")
            .with_class("poster-content")
            .with_child(Element::new("p").with_child(img("a.png", "")));
        assert_eq!(
            run(vec![div.into()]),
            r#"<div class="poster-content"><figure class="rehype-figure"><img src="a.png" alt=""></figure></div>"#
        );
    }

    #[test]
    fn test_empty_paragraph_untouched() {
        assert_eq!(run(vec![Element::new("p").into()]), "<p></p>");
    }
}
