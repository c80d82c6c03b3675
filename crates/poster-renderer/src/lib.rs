//! Markdown to poster HTML.
//!
//! This crate turns a Markdown document with YAML frontmatter into a
//! self-contained HTML poster: a header with title, authors and
//! affiliations, followed by a grid of sections, one per `<h2>`.
//!
//! # Architecture
//!
//! The pipeline works on two trees:
//!
//! - [`MdNode`]: Markdown syntax tree built from pulldown-cmark events, with
//!   container directives (`:::row`, `:::column`) as first-class nodes
//! - [`Node`]: HTML syntax tree rewritten by the later stages and finally
//!   serialized by [`to_html`]
//!
//! [`PosterRenderer`] runs every stage in order. The stages are public so
//! they can be used and tested on their own.
//!
//! # Example
//!
//! ```
//! use poster_renderer::PosterRenderer;
//!
//! let markdown = "---
//! title: Demo
//! authors:
//!   - Alice: Lab
//! ---
//! ## Intro
//! Hello";
//!
//! let result = PosterRenderer::new().render(markdown);
//! assert!(result.html.starts_with("<!doctype html>"));
//! assert!(result.html.contains("<p>Alice<sup>1</sup></p>"));
//! assert!(result.warnings.is_empty());
//! ```

mod convert;
mod directive;
mod document;
mod figure;
mod hast;
mod header;
mod highlight;
mod html_sink;
mod image;
mod math;
mod mdast;
mod renderer;
mod sanitize;
mod sections;
mod stringify;

pub use convert::to_hast;
pub use directive::{DirectiveMarkup, map_directives};
pub use document::{
    DEFAULT_FONT_STYLESHEET, DocumentOptions, Preconnect, build_document, inject_style,
};
pub use figure::wrap_figures;
pub use hast::{Element, Node};
pub use header::{build_header, wrap_main_with_header};
pub use highlight::{DEFAULT_HIGHLIGHT_THEME, highlight_code, highlight_theme_css};
pub use image::{annotate_image, annotate_images};
pub use math::render_math;
pub use mdast::{Align, Directive, Image, MdDocument, MdNode, parse};
pub use renderer::{DEFAULT_FOOTNOTE_LABEL, PosterRenderer, RenderResult};
pub use sanitize::{Schema, sanitize};
pub use sections::wrap_sections;
pub use stringify::to_html;
