//! Syntax highlighting for fenced code blocks.
//!
//! Uses syntect's class-based HTML output with an `hl-` prefix. The matching
//! stylesheet comes from [`highlight_theme_css`].

use std::sync::LazyLock;

use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::hast::{Element, Node};

/// Default theme for [`highlight_theme_css`].
pub const DEFAULT_HIGHLIGHT_THEME: &str = "InspiredGitHub";

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

fn class_style() -> ClassStyle {
    ClassStyle::SpacedPrefixed { prefix: "hl-" }
}

/// Highlight every `pre > code.language-*` block with a known language.
///
/// Highlighted code elements gain the `hl` class. Math blocks and unknown
/// languages are left untouched.
pub fn highlight_code(nodes: &mut [Node]) {
    for node in nodes {
        let Node::Element(element) = node else {
            continue;
        };
        if element.tag == "pre" {
            if let Some(code) = element.find_child_mut("code") {
                highlight_block(code);
            }
        } else {
            highlight_code(&mut element.children);
        }
    }
}

fn highlight_block(code: &mut Element) {
    let Some(lang) = code
        .classes()
        .find_map(|c| c.strip_prefix("language-"))
        .map(str::to_owned)
    else {
        return;
    };
    if lang == "math" {
        return;
    }
    let Some(syntax) = SYNTAX_SET.find_syntax_by_token(&lang) else {
        tracing::debug!(lang = %lang, "No syntax for code block");
        return;
    };

    let source = code.text_content();
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, class_style());
    for line in LinesWithEndings::from(&source) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            tracing::warn!(lang = %lang, error = %e, "Failed to highlight code block");
            return;
        }
    }

    code.children = vec![Node::Raw(generator.finalize())];
    code.add_class("hl");
}

/// Stylesheet for a syntect theme, matching the classes [`highlight_code`]
/// emits. `None` if the theme is unknown.
#[must_use]
pub fn highlight_theme_css(theme: &str) -> Option<String> {
    let Some(theme_data) = THEME_SET.themes.get(theme) else {
        tracing::warn!(theme, "Unknown highlight theme");
        return None;
    };
    match css_for_theme_with_class_style(theme_data, class_style()) {
        Ok(css) => Some(css),
        Err(e) => {
            tracing::warn!(theme, error = %e, "Failed to generate highlight CSS");
            None
        }
    }
}
