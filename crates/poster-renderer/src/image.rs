//! Image size hints.
//!
//! Two syntaxes are recognized:
//!
//! - `![alt](src){width=300 height=200}`: a brace marker right after the image
//! - `![alt width:300 height:200](src)`: legacy tokens in the alt text
//!
//! The marker wins. Alt tokens are only read when no marker with a width or
//! height is present. A marker is always removed from the text, sized or not.

use std::sync::LazyLock;

use regex::Regex;

use crate::mdast::{Image, MdNode};

static MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\{([^}]+)\}\s*").unwrap());
static MARKER_WIDTH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"width\s*=\s*(\S+)").unwrap());
static MARKER_HEIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"height\s*=\s*(\S+)").unwrap());
static ALT_WIDTH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"width\s*:\s*(\S+)").unwrap());
static ALT_HEIGHT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"height\s*:\s*(\S+)").unwrap());

/// Attach size hints to every image in the tree.
pub fn annotate_images(nodes: &mut Vec<MdNode>) {
    let mut out = Vec::with_capacity(nodes.len());
    let mut iter = std::mem::take(nodes).into_iter().peekable();

    while let Some(node) = iter.next() {
        match node {
            MdNode::Image(image) => {
                let next_text = match iter.peek() {
                    Some(MdNode::Text(_)) => match iter.next() {
                        Some(MdNode::Text(text)) => Some(text),
                        _ => None,
                    },
                    _ => None,
                };
                let (image, rest) = annotate_image(image, next_text);
                out.push(MdNode::Image(image));
                out.extend(rest.map(MdNode::Text));
            }
            mut other => {
                if let Some(children) = other.children_mut() {
                    annotate_images(children);
                }
                out.push(other);
            }
        }
    }

    *nodes = out;
}

/// Apply size hints to one image.
///
/// `next_text` is the text immediately following the image, if any. Returns
/// the updated image and what remains of that text (`None` once empty).
///
/// ```
/// use poster_renderer::{Image, annotate_image};
///
/// let (image, rest) = annotate_image(Image::default(), Some("{width=300} cm".into()));
/// assert_eq!(image.width.as_deref(), Some("300"));
/// assert_eq!(rest.as_deref(), Some("cm"));
/// ```
#[must_use]
pub fn annotate_image(mut image: Image, next_text: Option<String>) -> (Image, Option<String>) {
    if let Some(text) = &next_text
        && let Some(marker) = MARKER.captures(text)
    {
        let attrs = &marker[1];
        let width = MARKER_WIDTH.captures(attrs).map(|c| c[1].to_owned());
        let height = MARKER_HEIGHT.captures(attrs).map(|c| c[1].to_owned());

        if width.is_some() || height.is_some() {
            image.width = width;
            image.height = height;
        } else {
            apply_alt_hints(&mut image);
        }

        // A matched marker is consumed whether or not it carried a size.
        let rest = &text[marker[0].len()..];
        let rest = (!rest.is_empty()).then(|| rest.to_owned());
        return (image, rest);
    }

    apply_alt_hints(&mut image);
    (image, next_text)
}

fn apply_alt_hints(image: &mut Image) {
    if let Some((token, width)) = capture(&ALT_WIDTH, &image.alt) {
        image.alt = image.alt.replacen(&token, "", 1).trim().to_owned();
        image.width = Some(width);
    }
    if let Some((token, height)) = capture(&ALT_HEIGHT, &image.alt) {
        image.alt = image.alt.replacen(&token, "", 1).trim().to_owned();
        image.height = Some(height);
    }
}

/// Whole match and first group.
fn capture(re: &Regex, haystack: &str) -> Option<(String, String)> {
    let captures = re.captures(haystack)?;
    Some((captures[0].to_owned(), captures[1].to_owned()))
}
