//! Poster metadata: frontmatter, authors and theme variables.
//!
//! A poster document starts with an optional YAML block delimited by `---`
//! lines. This crate splits that block from the Markdown body, parses it into
//! a [`Frontmatter`] record and resolves the derived data the renderer needs:
//!
//! - [`resolve_authors`]: numbers affiliations in first-seen order and maps
//!   each author to the affiliation numbers they reference
//! - [`ThemeVars::resolve`]: merges `style` overrides over paper-size presets
//!   and defaults
//! - [`build_poster_style`]: renders the resolved theme as the poster stylesheet
//!
//! # Example
//!
//! ```
//! use poster_meta::{extract_frontmatter, resolve_authors};
//!
//! let doc = "---\ntitle: Demo\nauthor:\n  Alice: Lab\n---\n## Intro\n";
//! let extracted = extract_frontmatter(doc);
//!
//! assert_eq!(extracted.frontmatter.title.as_deref(), Some("Demo"));
//! assert_eq!(extracted.body, "## Intro\n");
//!
//! let resolved = resolve_authors(extracted.frontmatter.all_authors());
//! assert_eq!(resolved.authors[0].affiliation_numbers, vec![1]);
//! ```

mod authors;
mod frontmatter;
mod style;
mod theme;

pub use authors::{ResolvedAffiliation, ResolvedAuthor, ResolvedAuthors, resolve_authors};
pub use frontmatter::{
    AuthorEntry, ExtractedFrontmatter, Frontmatter, FrontmatterError, StyleOverrides,
    extract_frontmatter, split_frontmatter,
};
pub use style::build_poster_style;
pub use theme::{DEFAULT_THEME, PaperSize, ThemeDefaults, ThemeVars, UnknownPaperSize};
