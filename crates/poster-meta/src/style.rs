//! Poster stylesheet generation.

use std::fmt::Write;

use crate::frontmatter::StyleOverrides;
use crate::theme::ThemeVars;

const FONT_SANS: &str = r#""Noto Sans", "Noto Sans JP", "Noto Sans Emoji", "Noto Sans Math", ui-sans-serif, sans-serif"#;
const FONT_SERIF: &str = r#""Noto Serif", "Noto Serif JP", ui-serif, serif"#;
const FONT_MONO: &str = r#""Noto Mono", ui-monospace, monospace"#;

/// Layout rules following the `:root` block. Everything here reads the
/// custom properties, so it does not depend on the theme.
const LAYOUT_CSS: &str = "
body {
  font-family: var(--font-sans);

  width: var(--width);
  height: var(--height);

  margin: 0;
  padding: var(--frame-padding);
  box-sizing: border-box;

  display: flex;
  flex-direction: column;
  gap: var(--title-content-gap);
}

header#poster-header {
  background-color: var(--primary-color);
  color: white;
  padding: var(--title-padding);
  flex: 0 0 auto;
}

header#poster-header h1#poster-title {
  text-align: center;
  font-size: var(--title-font-size);
  margin: 0;
  margin-bottom: var(--title-padding);
}

header#poster-header div#poster-author {
  display: flex;
  justify-content: center;
  gap: var(--author-affiliation-gap);
}

header#poster-header div#poster-author p {
  margin: 0;
  font-size: var(--author-font-size);
}

header#poster-header ol#poster-affiliation {
  display: flex;
  justify-content: center;
  gap: var(--author-affiliation-gap);
  list-style-position: inside;
}

header#poster-header ol#poster-affiliation li {
  margin: 0;
  font-size: var(--affiliation-font-size);
}

main#poster-main {
  flex: 1 1 auto;
  min-height: 0;

  display: flex;
  flex-wrap: wrap;
  flex-direction: column;
  gap: var(--content-gap);
}

main#poster-main .poster-section {
  width: calc((100% - (var(--num-columns) - 1) * var(--content-gap)) / var(--num-columns));
}

main#poster-main .poster-section h2 {
  color: white;
  background-color: var(--primary-color);
  padding: var(--section-title-padding);
  font-size: var(--section-title-font-size);
  margin: 0;
}

main#poster-main .poster-section .poster-content {
  padding: var(--section-content-padding);
}

main#poster-main .poster-section .poster-content p {
  margin: 0;
  text-align: justify;
  font-size: var(--content-font-size);
}

main#poster-main .poster-section .poster-content p strong {
  color: var(--secondary-color);
}

main#poster-main .poster-section .poster-content h3 {
  color: var(--secondary-color);
  font-size: var(--subsection-title-font-size);
  font-weight: bold;
}

main#poster-main .poster-section .poster-content > h3:first-child {
  margin-top: 0;
}

main#poster-main .poster-section .poster-content table {
  width: 100%;
  margin: 24px 0;
  border: 2px solid black;
  border-width: 2px 0;
  border-collapse: collapse;
}

main#poster-main .poster-section .poster-content table th {
  border-bottom: 1px solid black;
}

main#poster-main .poster-section .poster-content table th,
main#poster-main .poster-section .poster-content table td {
  font-size: var(--content-font-size);
  text-align: center;
}

main#poster-main .poster-section .poster-content li {
  font-size: var(--content-font-size);
  padding: var(--list-padding);
}

main#poster-main .poster-section .poster-content li::marker {
  color: var(--secondary-color);
}

main#poster-main .poster-section .poster-content .poster-content-row {
  display: flex;
  gap: var(--content-gap);
}

main#poster-main .poster-section .poster-content .poster-content-column {
  display: block;
}";

/// Build the poster stylesheet from `style` overrides.
///
/// The output is a `:root` block of custom properties holding the resolved
/// theme, followed by the fixed layout rules. Same input, same output.
#[must_use]
pub fn build_poster_style(style: Option<&StyleOverrides>) -> String {
    let theme = ThemeVars::resolve(style);
    let mut css = String::with_capacity(1024 + LAYOUT_CSS.len());
    // Writing to a String never fails.
    let _ = write_root(&mut css, &theme);
    css.push_str(LAYOUT_CSS);
    css
}

fn write_root(css: &mut String, t: &ThemeVars) -> std::fmt::Result {
    writeln!(css, ":root {{")?;
    writeln!(css, "  /* Size */")?;
    writeln!(css, "  --width: {};", t.width)?;
    writeln!(css, "  --height: {};", t.height)?;
    writeln!(css)?;
    writeln!(css, "  /* Color */")?;
    writeln!(css, "  --primary-color: {};", t.primary_color)?;
    writeln!(css, "  --secondary-color: {};", t.secondary_color)?;
    writeln!(css)?;
    writeln!(css, "  /* Fonts */")?;
    writeln!(css, "  --font-sans: {FONT_SANS};")?;
    writeln!(css, "  --font-serif: {FONT_SERIF};")?;
    writeln!(css, "  --font-mono: {FONT_MONO};")?;
    writeln!(css)?;
    writeln!(css, "  --title-font-size: {};", t.title_font_size)?;
    writeln!(css, "  --author-font-size: {};", t.author_font_size)?;
    writeln!(css, "  --affiliation-font-size: {};", t.affiliation_font_size)?;
    writeln!(css, "  --section-title-font-size: {};", t.section_title_font_size)?;
    writeln!(css, "  --subsection-title-font-size: {};", t.subsection_title_font_size)?;
    writeln!(css, "  --content-font-size: {};", t.content_font_size)?;
    writeln!(css)?;
    writeln!(css, "  --frame-padding: {};", t.frame_padding)?;
    writeln!(css, "  --title-padding: {};", t.title_padding)?;
    writeln!(css, "  --author-affiliation-gap: {};", t.author_affiliation_gap)?;
    writeln!(css, "  --content-gap: {};", t.content_gap)?;
    writeln!(css, "  --section-title-padding: {};", t.section_title_padding)?;
    writeln!(css, "  --section-content-padding: {};", t.section_content_padding)?;
    writeln!(css, "  --title-content-gap: {};", t.title_content_gap)?;
    writeln!(css, "  --list-padding: {};", t.list_padding)?;
    writeln!(css)?;
    writeln!(css, "  --num-columns: {};", t.num_columns)?;
    writeln!(css, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn root_block(css: &str) -> &str {
        let end = css.find("\n}\n").expect(":root block end");
        &css[..end + 2]
    }

    #[test]
    fn test_default_root_block() {
        let css = build_poster_style(None);
        let expected = r#":root {
  /* Size */
  --width: 841mm;
  --height: 1189mm;

  /* Color */
  --primary-color: #8fc231;
  --secondary-color: #689f39;

  /* Fonts */
  --font-sans: "Noto Sans", "Noto Sans JP", "Noto Sans Emoji", "Noto Sans Math", ui-sans-serif, sans-serif;
  --font-serif: "Noto Serif", "Noto Serif JP", ui-serif, serif;
  --font-mono: "Noto Mono", ui-monospace, monospace;

  --title-font-size: 96px;
  --author-font-size: 54px;
  --affiliation-font-size: 54px;
  --section-title-font-size: 64px;
  --subsection-title-font-size: 36px;
  --content-font-size: 24px;

  --frame-padding: 64px 96px;
  --title-padding: 48px;
  --author-affiliation-gap: 24px;
  --content-gap: 64px;
  --section-title-padding: 36px 48px;
  --section-content-padding: 24px 48px;
  --title-content-gap: 48px;
  --list-padding: 0 0 8px 0;

  --num-columns: 2;
}"#;
        assert_eq!(root_block(&css), expected);
    }

    #[test]
    fn test_layout_follows_root_block() {
        let css = build_poster_style(None);
        assert!(css.contains("}\n\nbody {\n  font-family: var(--font-sans);"));
        assert!(css.ends_with(".poster-content-column {\n  display: block;\n}"));
        assert!(css.contains("list-style-position: inside;"));
    }

    #[test]
    fn test_overrides_applied() {
        let style = StyleOverrides {
            size: Some("A4".to_owned()),
            primary_color: Some("#000".to_owned()),
            num_columns: Some(3),
            ..Default::default()
        };
        let css = build_poster_style(Some(&style));
        assert!(css.contains("--width: 210mm;"));
        assert!(css.contains("--height: 297mm;"));
        assert!(css.contains("--primary-color: #000;"));
        assert!(css.contains("--num-columns: 3;"));
    }

    #[test]
    fn test_deterministic() {
        let style = StyleOverrides {
            content_gap: Some("12px".to_owned()),
            ..Default::default()
        };
        assert_eq!(build_poster_style(Some(&style)), build_poster_style(Some(&style)));
    }
}
