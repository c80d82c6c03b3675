//! Theme variables and paper-size presets.

use std::fmt;
use std::str::FromStr;

use crate::frontmatter::StyleOverrides;

/// Named paper size accepted by `style.size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaperSize {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
    A8,
    A9,
    A10,
    B0,
    B1,
    B2,
    B3,
    B4,
    B5,
    B6,
    B7,
    B8,
    B9,
    B10,
    JisB0,
    JisB1,
    JisB2,
    JisB3,
    JisB4,
    JisB5,
    JisB6,
    JisB7,
    JisB8,
    JisB9,
    JisB10,
    Letter,
    Legal,
    Ledger,
}

struct PaperSpec {
    token: &'static str,
    width: &'static str,
    height: &'static str,
}

const fn paper(token: &'static str, width: &'static str, height: &'static str) -> PaperSpec {
    PaperSpec {
        token,
        width,
        height,
    }
}

/// Preset table, indexed by `PaperSize` discriminant.
const PAPER_SIZES: [PaperSpec; 36] = [
    // ISO A
    paper("A0", "841mm", "1189mm"),
    paper("A1", "594mm", "841mm"),
    paper("A2", "420mm", "594mm"),
    paper("A3", "297mm", "420mm"),
    paper("A4", "210mm", "297mm"),
    paper("A5", "148mm", "210mm"),
    paper("A6", "105mm", "148mm"),
    paper("A7", "74mm", "105mm"),
    paper("A8", "52mm", "74mm"),
    paper("A9", "37mm", "52mm"),
    paper("A10", "26mm", "37mm"),
    // ISO B
    paper("B0", "1000mm", "1414mm"),
    paper("B1", "707mm", "1000mm"),
    paper("B2", "500mm", "707mm"),
    paper("B3", "353mm", "500mm"),
    paper("B4", "250mm", "353mm"),
    paper("B5", "176mm", "250mm"),
    paper("B6", "125mm", "176mm"),
    paper("B7", "88mm", "125mm"),
    paper("B8", "62mm", "88mm"),
    paper("B9", "44mm", "62mm"),
    paper("B10", "31mm", "44mm"),
    // JIS B
    paper("JIS-B0", "1030mm", "1456mm"),
    paper("JIS-B1", "728mm", "1030mm"),
    paper("JIS-B2", "515mm", "728mm"),
    paper("JIS-B3", "364mm", "515mm"),
    paper("JIS-B4", "257mm", "364mm"),
    paper("JIS-B5", "182mm", "257mm"),
    paper("JIS-B6", "128mm", "182mm"),
    paper("JIS-B7", "91mm", "128mm"),
    paper("JIS-B8", "64mm", "91mm"),
    paper("JIS-B9", "45mm", "64mm"),
    paper("JIS-B10", "32mm", "45mm"),
    // North American
    paper("letter", "8.5in", "11in"),
    paper("legal", "8.5in", "14in"),
    paper("ledger", "11in", "17in"),
];

impl PaperSize {
    /// Every size, in preset table order.
    pub const ALL: [Self; 36] = [
        Self::A0,
        Self::A1,
        Self::A2,
        Self::A3,
        Self::A4,
        Self::A5,
        Self::A6,
        Self::A7,
        Self::A8,
        Self::A9,
        Self::A10,
        Self::B0,
        Self::B1,
        Self::B2,
        Self::B3,
        Self::B4,
        Self::B5,
        Self::B6,
        Self::B7,
        Self::B8,
        Self::B9,
        Self::B10,
        Self::JisB0,
        Self::JisB1,
        Self::JisB2,
        Self::JisB3,
        Self::JisB4,
        Self::JisB5,
        Self::JisB6,
        Self::JisB7,
        Self::JisB8,
        Self::JisB9,
        Self::JisB10,
        Self::Letter,
        Self::Legal,
        Self::Ledger,
    ];

    fn spec(self) -> &'static PaperSpec {
        &PAPER_SIZES[self as usize]
    }

    /// Frontmatter token for this size (e.g. `"JIS-B4"`).
    #[must_use]
    pub fn token(self) -> &'static str {
        self.spec().token
    }

    /// Page width as a CSS length.
    #[must_use]
    pub fn width(self) -> &'static str {
        self.spec().width
    }

    /// Page height as a CSS length.
    #[must_use]
    pub fn height(self) -> &'static str {
        self.spec().height
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Error returned when a `style.size` token is not a known paper size.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unknown paper size \"{0}\"")]
pub struct UnknownPaperSize(pub String);

impl FromStr for PaperSize {
    type Err = UnknownPaperSize;

    /// Tokens are matched exactly, as listed in the preset table.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.token() == s)
            .ok_or_else(|| UnknownPaperSize(s.to_owned()))
    }
}

/// Hardcoded theme defaults.
#[derive(Clone, Copy, Debug)]
pub struct ThemeDefaults {
    pub width: &'static str,
    pub height: &'static str,
    pub primary_color: &'static str,
    pub secondary_color: &'static str,
    pub title_font_size: &'static str,
    pub author_font_size: &'static str,
    pub affiliation_font_size: &'static str,
    pub section_title_font_size: &'static str,
    pub subsection_title_font_size: &'static str,
    pub content_font_size: &'static str,
    pub frame_padding: &'static str,
    pub title_padding: &'static str,
    pub author_affiliation_gap: &'static str,
    pub content_gap: &'static str,
    pub section_title_padding: &'static str,
    pub section_content_padding: &'static str,
    pub title_content_gap: &'static str,
    pub list_padding: &'static str,
    pub num_columns: u32,
}

/// Theme used when the frontmatter sets nothing (A0 portrait, two columns).
pub const DEFAULT_THEME: ThemeDefaults = ThemeDefaults {
    width: "841mm",
    height: "1189mm",
    primary_color: "#8fc231",
    secondary_color: "#689f39",
    title_font_size: "96px",
    author_font_size: "54px",
    affiliation_font_size: "54px",
    section_title_font_size: "64px",
    subsection_title_font_size: "36px",
    content_font_size: "24px",
    frame_padding: "64px 96px",
    title_padding: "48px",
    author_affiliation_gap: "24px",
    content_gap: "64px",
    section_title_padding: "36px 48px",
    section_content_padding: "24px 48px",
    title_content_gap: "48px",
    list_padding: "0 0 8px 0",
    num_columns: 2,
};

/// Fully resolved theme variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeVars {
    pub width: String,
    pub height: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub title_font_size: String,
    pub author_font_size: String,
    pub affiliation_font_size: String,
    pub section_title_font_size: String,
    pub subsection_title_font_size: String,
    pub content_font_size: String,
    pub frame_padding: String,
    pub title_padding: String,
    pub author_affiliation_gap: String,
    pub content_gap: String,
    pub section_title_padding: String,
    pub section_content_padding: String,
    pub title_content_gap: String,
    pub list_padding: String,
    pub num_columns: u32,
}

impl Default for ThemeVars {
    fn default() -> Self {
        Self::resolve(None)
    }
}

impl ThemeVars {
    /// Resolve theme variables from frontmatter overrides.
    ///
    /// Each field is the explicit override, else the default. A known
    /// `size` then replaces width and height, even when they were given
    /// explicitly. Unknown sizes are ignored.
    #[must_use]
    pub fn resolve(style: Option<&StyleOverrides>) -> Self {
        let d = DEFAULT_THEME;
        let pick = |value: Option<&String>, default: &str| {
            value.map_or_else(|| default.to_owned(), Clone::clone)
        };
        let s = style.cloned().unwrap_or_default();

        let mut theme = Self {
            width: pick(s.width.as_ref(), d.width),
            height: pick(s.height.as_ref(), d.height),
            primary_color: pick(s.primary_color.as_ref(), d.primary_color),
            secondary_color: pick(s.secondary_color.as_ref(), d.secondary_color),
            title_font_size: pick(s.title_font_size.as_ref(), d.title_font_size),
            author_font_size: pick(s.author_font_size.as_ref(), d.author_font_size),
            affiliation_font_size: pick(s.affiliation_font_size.as_ref(), d.affiliation_font_size),
            section_title_font_size: pick(
                s.section_title_font_size.as_ref(),
                d.section_title_font_size,
            ),
            subsection_title_font_size: pick(
                s.subsection_title_font_size.as_ref(),
                d.subsection_title_font_size,
            ),
            content_font_size: pick(s.content_font_size.as_ref(), d.content_font_size),
            frame_padding: pick(s.frame_padding.as_ref(), d.frame_padding),
            title_padding: pick(s.title_padding.as_ref(), d.title_padding),
            author_affiliation_gap: pick(
                s.author_affiliation_gap.as_ref(),
                d.author_affiliation_gap,
            ),
            content_gap: pick(s.content_gap.as_ref(), d.content_gap),
            section_title_padding: pick(s.section_title_padding.as_ref(), d.section_title_padding),
            section_content_padding: pick(
                s.section_content_padding.as_ref(),
                d.section_content_padding,
            ),
            title_content_gap: pick(s.title_content_gap.as_ref(), d.title_content_gap),
            list_padding: pick(s.list_padding.as_ref(), d.list_padding),
            num_columns: s.num_columns.unwrap_or(d.num_columns),
        };

        match s.size.as_deref().map(str::parse::<PaperSize>) {
            Some(Ok(size)) => {
                size.width().clone_into(&mut theme.width);
                size.height().clone_into(&mut theme.height);
            }
            Some(Err(e)) => tracing::debug!(error = %e, "Paper size ignored"),
            None => {}
        }

        theme
    }
}
