//! Math rendering to MathML.
//!
//! Inline math (`code.math-inline`) renders in inline style. Display math,
//! either `pre > code.math-display` or a standalone `code.math-display`,
//! renders in block style and replaces the whole `<pre>`.

use latex2mathml::{DisplayStyle, latex_to_mathml};

use crate::hast::{Element, Node};

/// Render math elements in place. Returns a warning per failed expression.
///
/// Elements that fail to convert are left as they are.
pub fn render_math(nodes: &mut [Node]) -> Vec<String> {
    let mut warnings = Vec::new();
    render_nodes(nodes, &mut warnings);
    warnings
}

fn render_nodes(nodes: &mut [Node], warnings: &mut Vec<String>) {
    for node in nodes {
        let Node::Element(element) = node else {
            continue;
        };
        match math_source(element) {
            Some((latex, style)) => match latex_to_mathml(&latex, style) {
                Ok(mathml) => *node = Node::Raw(mathml),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to render math");
                    warnings.push(format!("Failed to render math: {e}"));
                }
            },
            None => render_nodes(&mut element.children, warnings),
        }
    }
}

/// LaTeX source and display style, if this element is math.
fn math_source(element: &Element) -> Option<(String, DisplayStyle)> {
    match element.tag.as_str() {
        "pre" => {
            let code = element.find_child("code")?;
            let is_math = code.has_class("math-display") || code.has_class("language-math");
            is_math.then(|| (code.text_content(), DisplayStyle::Block))
        }
        "code" if element.has_class("math-inline") => {
            Some((element.text_content(), DisplayStyle::Inline))
        }
        "code" if element.has_class("math-display") => {
            Some((element.text_content(), DisplayStyle::Block))
        }
        _ => None,
    }
}
