//! End-to-end tests for the poster pipeline.

use poster_renderer::{
    PosterRenderer, RenderResult, Schema, annotate_images, map_directives, parse, sanitize,
    to_hast, wrap_sections,
};
use pretty_assertions::assert_eq;

fn render(markdown: &str) -> RenderResult {
    PosterRenderer::new().with_highlighting(false).render(markdown)
}

/// Contents of `<main id="poster-main">`.
fn main_of(html: &str) -> &str {
    let start = html.find("<main id=\"poster-main\">").map_or(0, |i| i + 23);
    let end = html.rfind("</main>").unwrap_or(html.len());
    &html[start..end]
}

#[test]
fn test_minimal_poster() {
    let result = render("---\ntitle: Demo\n---\n## Intro\nHello");

    assert_eq!(result.frontmatter.title.as_deref(), Some("Demo"));
    assert!(result.html.contains("<h1 id=\"poster-title\">Demo</h1>"));
    assert_eq!(
        main_of(&result.html),
        "\n<div class=\"poster-section\"><h2>Intro</h2><div class=\"poster-content\">\n<p>Hello</p></div></div>\n"
    );
    assert!(result.warnings.is_empty());
}

#[test]
fn test_document_head() {
    let html = render("---\ntitle: Demo\n---\n").html;
    assert!(html.starts_with(
        "<!doctype html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"utf-8\">\n<title>Demo</title>\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <link rel=\"preconnect\" href=\"https://fonts.googleapis.com\">\n\
         <link rel=\"preconnect\" href=\"https://fonts.gstatic.com\" crossorigin>\n<style>:root {"
    ));
    assert!(html.contains("<link rel=\"stylesheet\" href=\"https://fonts.googleapis.com/css2?family=Noto+Color+Emoji"));
    assert!(html.ends_with("</body>\n</html>\n"));
}

#[test]
fn test_without_frontmatter() {
    let result = render("Just text");
    assert_eq!(result.frontmatter, Default::default());
    assert!(result.html.contains(
        "<header id=\"poster-header\"><h1 id=\"poster-title\"></h1><div id=\"poster-author\"></div><ol id=\"poster-affiliation\"></ol></header>"
    ));
    assert_eq!(main_of(&result.html), "\n<p>Just text</p>\n");
    assert!(!result.html.contains("<title>"));
}

#[test]
fn test_invalid_frontmatter_degrades() {
    let result = render("---\ntitle: [unclosed\n---\nBody");
    assert_eq!(result.frontmatter, Default::default());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(main_of(&result.html), "\n<p>Body</p>\n");
}

#[test]
fn test_one_section_per_h2() {
    let md = "Abstract\n\n## A\none\n\n### Sub\n\n## B\ntwo\n\n## C\n";
    let html = render(md).html;
    assert_eq!(html.matches("class=\"poster-section\"").count(), 3);
    assert_eq!(html.matches("class=\"poster-content\"").count(), 2);
    assert!(main_of(&html).starts_with("\n<p>Abstract</p>\n<div class=\"poster-section\"><h2>A</h2>"));
}

#[test]
fn test_shared_affiliation_numbers() {
    let md = "---\nauthors:\n  - A: [X, Y]\n  - B: [Y]\n---\n";
    let html = render(md).html;
    assert!(html.contains(
        "<div id=\"poster-author\"><p>A<sup>1</sup><sup>2</sup></p><p>B<sup>2</sup></p></div>\
         <ol id=\"poster-affiliation\"><li>X</li><li>Y</li></ol>"
    ));
}

#[test]
fn test_size_overrides_width() {
    let md = "---\nstyle:\n  size: A4\n  width: 999mm\n---\n";
    let html = render(md).html;
    assert!(html.contains("210mm"));
    assert!(!html.contains("999mm"));
}

#[test]
fn test_image_marker_and_figure() {
    let html = render("![Chart](data:image/png;base64,AAAA){width=300}").html;
    assert_eq!(
        main_of(&html),
        "\n<figure class=\"rehype-figure\"><img src=\"data:image/png;base64,AAAA\" alt=\"Chart\" width=\"300\">\
         <figcaption>Chart</figcaption></figure>\n"
    );
}

#[test]
fn test_legacy_alt_hints() {
    let html = render("see ![Chart width:40% height:3cm](c.png)").html;
    assert!(html.contains("<img src=\"c.png\" alt=\"Chart\" width=\"40%\" height=\"3cm\">"));
}

#[test]
fn test_row_and_column_directives() {
    let md = "::::row\n:::column\nA\n:::\n:::column\nB\n:::\n::::";
    assert_eq!(
        main_of(&render(md).html),
        "\n<div class=\"poster-content-row\">\
         <div class=\"poster-content-column\"><p>A</p></div>\
         <div class=\"poster-content-column\"><p>B</p></div></div>\n"
    );
}

#[test]
fn test_unknown_directive_unclassed() {
    let html = render(":::note\nX\n:::").html;
    assert_eq!(main_of(&html), "\n<div><p>X</p></div>\n");
}

#[test]
fn test_dangerous_content_removed() {
    let md = "<script>alert(1)</script>\n\n[x](javascript:alert(1)) <img src=x onerror=alert(1)>";
    let html = render(md).html;
    assert!(!html.contains("alert"));
    assert!(main_of(&html).contains("<a>x</a>"));
}

#[test]
fn test_footnotes_in_last_section() {
    let md = "## A\nText[^1]\n\n[^1]: Note";
    let html = render(md).html;
    assert!(html.contains("aria-describedby=\"user-content-footnote-label\""));
    assert!(html.contains("<h2 class=\"sr-only\" id=\"user-content-footnote-label\">脚注</h2>"));
    assert_eq!(html.matches("class=\"poster-section\"").count(), 1);
    assert!(html.find("data-footnotes").unwrap_or(0) > html.find("<h2>A</h2>").unwrap_or(usize::MAX));
}

#[test]
fn test_math_rendered() {
    let html = render("$E = mc^2$").html;
    assert!(html.contains("<math"));
    assert!(!html.contains("math-inline"));
}

#[test]
fn test_task_list_survives_sanitizer() {
    let html = render("- [x] done").html;
    assert!(html.contains(
        "<ul class=\"contains-task-list\">\n<li class=\"task-list-item\"><input type=\"checkbox\" checked disabled> done</li>\n</ul>"
    ));
}

/// Idempotence holds for the sanitizer stage output, before math and
/// highlighting add pre-rendered markup that a second pass would drop.
#[test]
fn test_sanitize_is_idempotent() {
    let md = "Intro <b>x</b>\n\n## A\n- [ ] t\n\n| a |\n|---|\n| [l](https://x.org \"t\") |\n\nText[^n] $x$\n\n[^n]: Note\n\n```rust\nfn x() {}\n```\n\n![i](data:image/png;base64,AA){height=2}";
    let mut doc = parse(md);
    annotate_images(&mut doc.children);
    map_directives(&mut doc.children);
    let schema = Schema::poster();

    let once = sanitize(wrap_sections(to_hast(&doc.children, "Notes")), &schema);
    let twice = sanitize(once.clone(), &schema);
    assert_eq!(once, twice);
}

#[test]
fn test_bare_urls_linked() {
    let html = render("Visit https://example.com now, or mail me@lab.example.org.").html;
    assert_eq!(
        main_of(&html),
        "\n<p>Visit <a href=\"https://example.com\">https://example.com</a> now, or mail \
         <a href=\"mailto:me@lab.example.org\">me@lab.example.org</a>.</p>\n"
    );
}

#[test]
fn test_bare_url_in_code_not_linked() {
    let html = render("`https://example.com`").html;
    assert!(!main_of(&html).contains("<a"));
}

#[test]
fn test_highlighting_enabled() {
    let result = PosterRenderer::new().render("```rust\nfn main() {}\n```");
    assert!(result.html.contains("<code class=\"language-rust hl\">"));
    assert!(result.html.contains("hl-source"));
}

#[test]
fn test_deterministic() {
    let md = "---\ntitle: T\nauthor: Me\n---\n## A\nx";
    assert_eq!(render(md).html, render(md).html);
}
