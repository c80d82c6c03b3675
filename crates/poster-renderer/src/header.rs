//! Poster header and main wrapper.

use poster_meta::{Frontmatter, ResolvedAuthors, resolve_authors};

use crate::hast::{Element, Node, find_mut};

/// Move the body's content under `main#poster-main` and prepend a
/// `header#poster-header` built from the frontmatter.
///
/// The header holds `h1#poster-title` (title lines separated by `<br>`),
/// `div#poster-author` (one `<p>` per author with `<sup>` affiliation
/// numbers) and `ol#poster-affiliation`.
///
/// Returns `false`, leaving the tree unchanged, when there is no
/// `html > body`.
pub fn wrap_main_with_header(document: &mut [Node], frontmatter: &Frontmatter) -> bool {
    let Some(body) = find_mut(document, "html").and_then(|html| html.find_child_mut("body")) else {
        tracing::debug!("No body element to wrap");
        return false;
    };

    let header = build_header(frontmatter);
    let main = Element::new("main")
        .with_attr("id", "poster-main")
        .with_children(std::mem::take(&mut body.children));
    body.children = vec![header.into(), main.into()];
    true
}

/// The poster header for a frontmatter record.
#[must_use]
pub fn build_header(frontmatter: &Frontmatter) -> Element {
    let ResolvedAuthors {
        authors,
        affiliations,
    } = resolve_authors(frontmatter.all_authors());

    let mut title = Vec::new();
    for (i, line) in frontmatter.title_lines().into_iter().enumerate() {
        if i > 0 {
            title.push(Element::new("br").into());
        }
        title.push(Node::text(line));
    }

    let authors = authors
        .into_iter()
        .map(|author| {
            let mut p = Element::new("p").with_child(Node::text(author.name));
            for number in author.affiliation_numbers {
                p = p.with_child(Element::new("sup").with_child(Node::text(number.to_string())));
            }
            Node::from(p)
        })
        .collect();

    let affiliations = affiliations
        .into_iter()
        .map(|affiliation| Element::new("li").with_child(Node::text(affiliation.name)).into())
        .collect();

    Element::new("header")
        .with_attr("id", "poster-header")
        .with_child(
            Element::new("h1")
                .with_attr("id", "poster-title")
                .with_children(title),
        )
        .with_child(
            Element::new("div")
                .with_attr("id", "poster-author")
                .with_children(authors),
        )
        .with_child(
            Element::new("ol")
                .with_attr("id", "poster-affiliation")
                .with_children(affiliations),
        )
}
