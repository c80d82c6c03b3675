//! Markdown to poster HTML pipeline.

use std::sync::Arc;

use poster_meta::{Frontmatter, build_poster_style, extract_frontmatter};

use crate::convert::to_hast;
use crate::directive::map_directives;
use crate::document::{DEFAULT_FONT_STYLESHEET, DocumentOptions, Preconnect, build_document, inject_style};
use crate::figure::wrap_figures;
use crate::header::wrap_main_with_header;
use crate::highlight::{DEFAULT_HIGHLIGHT_THEME, highlight_code, highlight_theme_css};
use crate::image::annotate_images;
use crate::math::render_math;
use crate::mdast::parse;
use crate::sanitize::{Schema, sanitize};
use crate::sections::wrap_sections;
use crate::stringify::to_html;

/// Default heading of the footnote section.
pub const DEFAULT_FOOTNOTE_LABEL: &str = "脚注";

/// Result of rendering a poster.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Complete HTML document.
    pub html: String,
    /// Parsed frontmatter (empty when absent or invalid).
    pub frontmatter: Frontmatter,
    /// Problems found along the way (invalid frontmatter, unclosed
    /// directives, math that failed to render).
    pub warnings: Vec<String>,
}

/// Markdown to poster HTML renderer.
///
/// Stages run in a fixed order: frontmatter extraction, Markdown parsing,
/// image hints, directive mapping, HTML conversion, section grouping,
/// sanitizing, figures, math, highlighting, document skeleton, poster
/// style and finally the header/main wrapper.
///
/// # Example
///
/// ```
/// use poster_renderer::PosterRenderer;
///
/// let result = PosterRenderer::new().render("---\ntitle: Demo\n---\n## Intro\nHello");
///
/// assert_eq!(result.frontmatter.title.as_deref(), Some("Demo"));
/// assert!(result.html.contains(r#"<h1 id="poster-title">Demo</h1>"#));
/// assert!(result.html.contains(r#"<div class="poster-section"><h2>Intro</h2>"#));
/// ```
#[derive(Clone, Debug)]
pub struct PosterRenderer {
    language: String,
    footnote_label: String,
    highlighting: bool,
    highlight_theme: String,
    math: bool,
    stylesheets: Vec<String>,
    preconnect: Vec<Preconnect>,
    schema: Arc<Schema>,
}

impl Default for PosterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PosterRenderer {
    /// Create a renderer with math and highlighting enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: "ja".to_owned(),
            footnote_label: DEFAULT_FOOTNOTE_LABEL.to_owned(),
            highlighting: true,
            highlight_theme: DEFAULT_HIGHLIGHT_THEME.to_owned(),
            math: true,
            stylesheets: vec![DEFAULT_FONT_STYLESHEET.to_owned()],
            preconnect: Preconnect::defaults(),
            schema: Arc::new(Schema::poster()),
        }
    }

    /// Set the `lang` attribute of the document.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the heading of the footnote section.
    #[must_use]
    pub fn with_footnote_label(mut self, label: impl Into<String>) -> Self {
        self.footnote_label = label.into();
        self
    }

    /// Enable or disable syntax highlighting of code blocks.
    #[must_use]
    pub fn with_highlighting(mut self, enabled: bool) -> Self {
        self.highlighting = enabled;
        self
    }

    /// Set the syntect theme used for the highlight stylesheet.
    #[must_use]
    pub fn with_highlight_theme(mut self, theme: impl Into<String>) -> Self {
        self.highlight_theme = theme.into();
        self
    }

    /// Enable or disable MathML rendering.
    #[must_use]
    pub fn with_math(mut self, enabled: bool) -> Self {
        self.math = enabled;
        self
    }

    /// Replace the external stylesheet URLs.
    #[must_use]
    pub fn with_stylesheets(mut self, stylesheets: Vec<String>) -> Self {
        self.stylesheets = stylesheets;
        self
    }

    /// Replace the preconnect hints.
    #[must_use]
    pub fn with_preconnect(mut self, preconnect: Vec<Preconnect>) -> Self {
        self.preconnect = preconnect;
        self
    }

    /// Render a Markdown document with optional frontmatter.
    ///
    /// Never fails: malformed input degrades to best-effort output and
    /// entries in [`RenderResult::warnings`].
    #[must_use]
    pub fn render(&self, markdown: &str) -> RenderResult {
        let extracted = extract_frontmatter(markdown);
        let frontmatter = extracted.frontmatter;
        let mut warnings = extracted.warnings;

        let mut doc = parse(extracted.body);
        warnings.append(&mut doc.warnings);
        annotate_images(&mut doc.children);
        map_directives(&mut doc.children);

        let fragment = wrap_sections(to_hast(&doc.children, &self.footnote_label));
        let mut fragment = sanitize(fragment, &self.schema);
        wrap_figures(&mut fragment);
        if self.math {
            warnings.extend(render_math(&mut fragment));
        }

        let mut extra_styles = Vec::new();
        if self.highlighting {
            highlight_code(&mut fragment);
            match highlight_theme_css(&self.highlight_theme) {
                Some(css) => extra_styles.push(css),
                None => warnings.push(format!(
                    "Unknown highlight theme \"{}\"",
                    self.highlight_theme
                )),
            }
        }

        let options = DocumentOptions {
            language: self.language.clone(),
            title: document_title(&frontmatter),
            style: build_poster_style(None),
            preconnect: self.preconnect.clone(),
            stylesheets: self.stylesheets.clone(),
            extra_styles,
        };
        let mut document = build_document(fragment, &options);
        inject_style(&mut document, &build_poster_style(frontmatter.style.as_ref()));
        wrap_main_with_header(&mut document, &frontmatter);

        let html = to_html(&document);
        tracing::debug!(
            bytes = html.len(),
            warnings = warnings.len(),
            "Rendered poster"
        );
        RenderResult {
            html,
            frontmatter,
            warnings,
        }
    }
}

/// First line of the title, if any.
fn document_title(frontmatter: &Frontmatter) -> Option<String> {
    frontmatter.title.as_ref()?;
    frontmatter
        .title_lines()
        .first()
        .map(|line| line.trim().to_owned())
        .filter(|line| !line.is_empty())
}
