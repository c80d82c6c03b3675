//! YAML frontmatter extraction.
//!
//! The block must start at byte 0 with a `---` line and end with the next
//! `---` line. Everything after the closing line is the Markdown body.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::theme::PaperSize;

/// Fence line opening and closing the frontmatter block.
const FENCE: &str = "---";

/// Parsed poster frontmatter.
///
/// Every field is optional. A document without a block, or with a block that
/// fails to parse, yields [`Frontmatter::default`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Frontmatter {
    /// Poster title. May contain line breaks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Single author entry (concatenated before `authors`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorEntry>,

    /// Author entries, as a list or a single entry.
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub authors: Option<Vec<AuthorEntry>>,

    /// Theme overrides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleOverrides>,
}

impl Frontmatter {
    /// Parse frontmatter from the YAML content of a block.
    ///
    /// Empty content returns a default instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or does not match the
    /// frontmatter shape.
    pub fn from_yaml(content: &str) -> Result<Self, FrontmatterError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        // A block holding only `null` or comments deserializes to unit.
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if value.is_null() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_value(value)?)
    }

    /// Check if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.authors.is_none() && self.style.is_none()
    }

    /// All author entries in document order: `author` first, then `authors`.
    pub fn all_authors(&self) -> impl Iterator<Item = &AuthorEntry> {
        self.author
            .iter()
            .chain(self.authors.iter().flat_map(|authors| authors.iter()))
    }

    /// Title split into lines. `\r\n` counts as a single break.
    ///
    /// A missing title yields one empty line.
    #[must_use]
    pub fn title_lines(&self) -> Vec<&str> {
        let title = self.title.as_deref().unwrap_or_default();
        title
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    }

    /// File name for saving the poster, derived from the title.
    ///
    /// Falls back to `poster.<ext>` when the title is missing or blank.
    ///
    /// ```
    /// use poster_meta::Frontmatter;
    ///
    /// let fm = Frontmatter { title: Some("Deep\nLearning".to_owned()), ..Default::default() };
    /// assert_eq!(fm.file_name("html"), "Deep Learning.html");
    /// assert_eq!(Frontmatter::default().file_name("md"), "poster.md");
    /// ```
    #[must_use]
    pub fn file_name(&self, ext: &str) -> String {
        let stem = self
            .title
            .as_deref()
            .map(|title| {
                title
                    .replace("\r\n", " ")
                    .replace(['\n', '\r', '/', '\\'], " ")
                    .trim()
                    .to_owned()
            })
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "poster".to_owned());
        format!("{stem}.{ext}")
    }
}

/// An author with zero or more affiliations.
///
/// In YAML this is either a bare name or a mapping from author name to one
/// affiliation name, a list of them, or `null`. A mapping may hold several
/// authors; their order is preserved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthorEntry {
    /// Author without affiliations.
    Name(String),
    /// Authors with their affiliation names, in document order.
    Affiliated(Vec<(String, Vec<String>)>),
}

impl AuthorEntry {
    /// Iterate over `(author, affiliations)` pairs held by this entry.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        let (name, affiliated) = match self {
            Self::Name(name) => (Some(name.as_str()), &[][..]),
            Self::Affiliated(authors) => (None, authors.as_slice()),
        };
        name.map(|name| (name, &[][..])).into_iter().chain(
            affiliated
                .iter()
                .map(|(name, affiliations)| (name.as_str(), affiliations.as_slice())),
        )
    }
}

impl<'de> Deserialize<'de> for AuthorEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AuthorEntryVisitor)
    }
}

struct AuthorEntryVisitor;

impl<'de> Visitor<'de> for AuthorEntryVisitor {
    type Value = AuthorEntry;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an author name or a mapping from author name to affiliations")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(AuthorEntry::Name(value.to_owned()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(AuthorEntry::Name(value))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut authors = Vec::new();
        while let Some((name, affiliations)) = map.next_entry::<String, Option<Affiliations>>()? {
            authors.push((name, affiliations.map(Affiliations::into_vec).unwrap_or_default()));
        }
        Ok(AuthorEntry::Affiliated(authors))
    }
}

impl Serialize for AuthorEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Name(name) => serializer.serialize_str(name),
            Self::Affiliated(authors) => {
                let mut map = serializer.serialize_map(Some(authors.len()))?;
                for (name, affiliations) in authors {
                    map.serialize_entry(name, affiliations)?;
                }
                map.end()
            }
        }
    }
}

/// Affiliation value of an author mapping: one name or a list with optional nulls.
#[derive(Deserialize)]
#[serde(untagged)]
enum Affiliations {
    One(String),
    Many(Vec<Option<String>>),
}

impl Affiliations {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name],
            Self::Many(names) => names.into_iter().flatten().collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<AuthorEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany<AuthorEntry>>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        OneOrMany::Many(entries) => entries,
        OneOrMany::One(entry) => vec![entry],
    }))
}

/// Theme overrides from the `style` frontmatter key.
///
/// Length fields take any CSS value; bare YAML numbers are accepted and kept
/// as written.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleOverrides {
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    /// Named paper size; see [`PaperSize`] for accepted tokens.
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub title_font_size: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub author_font_size: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub affiliation_font_size: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub section_title_font_size: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub subsection_title_font_size: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub content_font_size: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub frame_padding: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub title_padding: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub author_affiliation_gap: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub content_gap: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub section_title_padding: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub section_content_padding: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub title_content_gap: Option<String>,
    #[serde(deserialize_with = "css_value", skip_serializing_if = "Option::is_none")]
    pub list_padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_columns: Option<u32>,
}

/// Accept a string or a bare number for a CSS value.
fn css_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    }))
}

/// Error type for frontmatter parsing.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    /// YAML parsing error.
    #[error("Invalid frontmatter YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Result of splitting and parsing frontmatter from a document.
#[derive(Clone, Debug)]
pub struct ExtractedFrontmatter<'a> {
    /// Parsed frontmatter (default when absent or malformed).
    pub frontmatter: Frontmatter,
    /// Raw YAML between the fences, if a block was found.
    pub raw: Option<&'a str>,
    /// Markdown body following the block.
    pub body: &'a str,
    /// Problems found while parsing (the block is never fatal).
    pub warnings: Vec<String>,
}

/// Split a leading frontmatter block from a document without parsing it.
///
/// Returns `(raw, body)`. When there is no complete block, `raw` is `None` and
/// `body` is the whole input.
///
/// ```
/// use poster_meta::split_frontmatter;
///
/// assert_eq!(split_frontmatter("---\ntitle: A\n---\nBody"), (Some("title: A"), "Body"));
/// assert_eq!(split_frontmatter("No block"), (None, "No block"));
/// ```
pub fn split_frontmatter(markdown: &str) -> (Option<&str>, &str) {
    let mut lines = markdown.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return (None, markdown);
    };
    if !first.ends_with('\n') || !is_fence(first) {
        return (None, markdown);
    }

    let content_start = first.len();
    let mut offset = content_start;
    for line in lines {
        if is_fence(line) {
            let raw = markdown[content_start..offset].trim_end_matches(['\r', '\n']);
            return (Some(raw), &markdown[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, markdown)
}

/// Check if a line (with or without its line break) is a `---` fence.
fn is_fence(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']).trim_end_matches([' ', '\t']) == FENCE
}

/// Split and parse the frontmatter block of a document.
///
/// A malformed block degrades to an empty record with a warning; the body is
/// still the text after the block.
pub fn extract_frontmatter(markdown: &str) -> ExtractedFrontmatter<'_> {
    let (raw, body) = split_frontmatter(markdown);
    let mut warnings = Vec::new();

    let frontmatter = match raw.map(Frontmatter::from_yaml) {
        None => Frontmatter::default(),
        Some(Ok(frontmatter)) => frontmatter,
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Failed to parse frontmatter");
            warnings.push(e.to_string());
            Frontmatter::default()
        }
    };

    if let Some(size) = frontmatter.style.as_ref().and_then(|s| s.size.as_deref())
        && let Err(e) = size.parse::<PaperSize>()
    {
        tracing::warn!(size, "Ignoring unknown paper size");
        warnings.push(e.to_string());
    }

    ExtractedFrontmatter {
        frontmatter,
        raw,
        body,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_without_block() {
        assert_eq!(split_frontmatter("## Intro\nHello"), (None, "## Intro\nHello"));
    }

    #[test]
    fn test_split_with_block() {
        let (raw, body) = split_frontmatter("---\ntitle: Demo\n---\n## Intro\nHello");
        assert_eq!(raw, Some("title: Demo"));
        assert_eq!(body, "## Intro\nHello");
    }

    #[test]
    fn test_split_crlf() {
        let (raw, body) = split_frontmatter("---\r\ntitle: Demo\r\n---\r\nBody");
        assert_eq!(raw, Some("title: Demo"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_split_closing_fence_at_eof() {
        let (raw, body) = split_frontmatter("---\ntitle: Demo\n---");
        assert_eq!(raw, Some("title: Demo"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_split_empty_block() {
        assert_eq!(split_frontmatter("---\n---\nBody"), (Some(""), "Body"));
    }

    #[test]
    fn test_split_unclosed_block() {
        let input = "---\ntitle: Demo\nBody";
        assert_eq!(split_frontmatter(input), (None, input));
    }

    #[test]
    fn test_split_requires_block_at_start() {
        let input = "\n---\ntitle: Demo\n---\n";
        assert_eq!(split_frontmatter(input), (None, input));
    }

    #[test]
    fn test_split_longer_fence_is_not_frontmatter() {
        let input = "----\ntitle: Demo\n----\n";
        assert_eq!(split_frontmatter(input), (None, input));
    }

    #[test]
    fn test_split_fence_with_trailing_spaces() {
        let (raw, body) = split_frontmatter("---  \ntitle: Demo\n--- \nBody");
        assert_eq!(raw, Some("title: Demo"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_parse_title_and_authors() {
        let yaml = "title: Demo\nauthor: Alice\nauthors:\n  - Bob\n  - Carol: [X, Y]\n";
        let fm = Frontmatter::from_yaml(yaml).unwrap();

        assert_eq!(fm.title.as_deref(), Some("Demo"));
        assert_eq!(fm.author, Some(AuthorEntry::Name("Alice".to_owned())));
        assert_eq!(
            fm.authors,
            Some(vec![
                AuthorEntry::Name("Bob".to_owned()),
                AuthorEntry::Affiliated(vec![(
                    "Carol".to_owned(),
                    vec!["X".to_owned(), "Y".to_owned()]
                )]),
            ])
        );
    }

    #[test]
    fn test_parse_single_authors_entry() {
        let fm = Frontmatter::from_yaml("authors: Alice").unwrap();
        assert_eq!(fm.authors, Some(vec![AuthorEntry::Name("Alice".to_owned())]));
    }

    #[test]
    fn test_parse_mapping_preserves_order_and_nulls() {
        let yaml = "author:\n  Zed: ~\n  Amy: Lab\n  Kim: [Lab, ~, Uni]\n";
        let fm = Frontmatter::from_yaml(yaml).unwrap();

        assert_eq!(
            fm.author,
            Some(AuthorEntry::Affiliated(vec![
                ("Zed".to_owned(), vec![]),
                ("Amy".to_owned(), vec!["Lab".to_owned()]),
                ("Kim".to_owned(), vec!["Lab".to_owned(), "Uni".to_owned()]),
            ]))
        );
    }

    #[test]
    fn test_parse_style_camel_case() {
        let yaml = "style:\n  size: A4\n  primaryColor: '#123456'\n  numColumns: 3\n  contentFontSize: 20\n";
        let style = Frontmatter::from_yaml(yaml).unwrap().style.unwrap();

        assert_eq!(style.size.as_deref(), Some("A4"));
        assert_eq!(style.primary_color.as_deref(), Some("#123456"));
        assert_eq!(style.num_columns, Some(3));
        assert_eq!(style.content_font_size.as_deref(), Some("20"));
    }

    #[test]
    fn test_parse_null_fields() {
        let fm = Frontmatter::from_yaml("title: ~\nstyle: ~\n").unwrap();
        assert!(fm.is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        assert!(Frontmatter::from_yaml("title: [unclosed").is_err());
    }

    #[test]
    fn test_extract_malformed_degrades_to_empty() {
        let extracted = extract_frontmatter("---\ntitle: [unclosed\n---\nBody");
        assert!(extracted.frontmatter.is_empty());
        assert_eq!(extracted.body, "Body");
        assert_eq!(extracted.warnings.len(), 1);
    }

    #[test]
    fn test_extract_non_mapping_degrades_to_empty() {
        let extracted = extract_frontmatter("---\njust a string\n---\nBody");
        assert!(extracted.frontmatter.is_empty());
        assert_eq!(extracted.body, "Body");
    }

    #[test]
    fn test_extract_without_block() {
        let extracted = extract_frontmatter("## Intro\nHello");
        assert!(extracted.frontmatter.is_empty());
        assert!(extracted.raw.is_none());
        assert_eq!(extracted.body, "## Intro\nHello");
        assert!(extracted.warnings.is_empty());
    }

    #[test]
    fn test_extract_unknown_size_warns() {
        let extracted = extract_frontmatter("---\ntitle: T\nstyle:\n  size: A99\n---\n");
        assert_eq!(extracted.frontmatter.title.as_deref(), Some("T"));
        assert_eq!(extracted.warnings.len(), 1);
        assert!(extracted.warnings[0].contains("A99"));
    }

    #[test]
    fn test_all_authors_concatenates_in_order() {
        let fm = Frontmatter::from_yaml("author: A\nauthors: [B, C]").unwrap();
        let names: Vec<_> = fm
            .all_authors()
            .flat_map(AuthorEntry::iter)
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_title_lines() {
        let fm = Frontmatter {
            title: Some("First\r\nSecond\nThird".to_owned()),
            ..Default::default()
        };
        assert_eq!(fm.title_lines(), vec!["First", "Second", "Third"]);
        assert_eq!(Frontmatter::default().title_lines(), vec![""]);
    }

    #[test]
    fn test_file_name_blank_title() {
        let fm = Frontmatter {
            title: Some("  ".to_owned()),
            ..Default::default()
        };
        assert_eq!(fm.file_name("html"), "poster.html");
    }

    #[test]
    fn test_file_name_strips_separators() {
        let fm = Frontmatter {
            title: Some("A/B\\C".to_owned()),
            ..Default::default()
        };
        assert_eq!(fm.file_name("html"), "A B C.html");
    }

    #[test]
    fn test_serialize_roundtrip_shape() {
        let fm = Frontmatter::from_yaml("title: T\nauthor:\n  Alice: [X]\n").unwrap();
        let json = serde_json::to_value(&fm).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "title": "T", "author": { "Alice": ["X"] } })
        );
    }
}
