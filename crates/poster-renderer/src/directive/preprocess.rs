//! Directive preprocessing.
//!
//! Container fences are rewritten into HTML comment markers on their own
//! blocks before Markdown parsing. The tree builder turns each marker pair
//! back into a directive node, so the content between them is parsed as
//! ordinary Markdown blocks.

use super::fence::FenceTracker;
use super::parser::{ContainerLine, parse_container_line};

const OPEN_PREFIX: &str = "<!--directive:open:";
const CLOSE_MARKER: &str = "<!--directive:close-->";
const MARKER_SUFFIX: &str = "-->";

/// Marker found in an HTML block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Marker {
    Open(String),
    Close,
}

/// Recognize a marker produced by [`DirectivePreprocessor`].
pub(crate) fn parse_marker(html: &str) -> Option<Marker> {
    let html = html.trim();
    if html == CLOSE_MARKER {
        return Some(Marker::Close);
    }
    let name = html.strip_prefix(OPEN_PREFIX)?.strip_suffix(MARKER_SUFFIX)?;
    Some(Marker::Open(name.to_owned()))
}

#[derive(Debug)]
struct OpenContainer {
    name: String,
    colons: usize,
}

/// Rewrites container directive fences into markers.
#[derive(Debug, Default)]
pub(crate) struct DirectivePreprocessor {
    fence: FenceTracker,
    open: Vec<OpenContainer>,
    warnings: Vec<String>,
}

impl DirectivePreprocessor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Rewrite `input`. Containers still open at the end are closed.
    pub(crate) fn process(&mut self, input: &str) -> String {
        let mut output = String::with_capacity(input.len() + 64);

        for (idx, line) in input.lines().enumerate() {
            self.process_line(line, idx + 1, &mut output);
        }
        self.finalize(&mut output);

        output
    }

    /// Warnings collected so far.
    pub(crate) fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    fn process_line(&mut self, line: &str, line_num: usize, output: &mut String) {
        let is_fence = self.fence.update(line);
        if is_fence || self.fence.in_fence() {
            push_line(output, line);
            return;
        }

        match parse_container_line(line) {
            Some(ContainerLine::Open {
                name,
                label,
                colons,
            }) => {
                push_marker(output, &format!("{OPEN_PREFIX}{name}{MARKER_SUFFIX}"));
                if let Some(label) = label {
                    push_line(output, &label);
                    output.push('\n');
                }
                self.open.push(OpenContainer { name, colons });
            }
            Some(ContainerLine::Close { colons }) => match self.open.last() {
                Some(top) if colons >= top.colons => {
                    self.open.pop();
                    push_marker(output, CLOSE_MARKER);
                }
                Some(top) => {
                    self.warn(format!(
                        "line {line_num}: {} cannot close :::{} opened with {} colons",
                        ":".repeat(colons),
                        top.name,
                        top.colons
                    ));
                    push_line(output, line);
                }
                None => {
                    self.warn(format!(
                        "line {line_num}: stray ::: with no opening directive"
                    ));
                    push_line(output, line);
                }
            },
            None => push_line(output, line),
        }
    }

    fn finalize(&mut self, output: &mut String) {
        while let Some(container) = self.open.pop() {
            self.warn(format!(
                "unclosed container directive :::{} (missing closing :::)",
                container.name
            ));
            push_marker(output, CLOSE_MARKER);
        }
    }

    fn warn(&mut self, message: String) {
        tracing::debug!(%message, "Directive warning");
        self.warnings.push(message);
    }
}

fn push_line(output: &mut String, line: &str) {
    output.push_str(line);
    output.push('\n');
}

/// Markers stand alone, separated from neighbours by blank lines.
fn push_marker(output: &mut String, marker: &str) {
    output.push('\n');
    output.push_str(marker);
    output.push_str("\n\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn process(input: &str) -> (String, Vec<String>) {
        let mut preprocessor = DirectivePreprocessor::new();
        let output = preprocessor.process(input);
        (output, preprocessor.take_warnings())
    }

    #[test]
    fn test_parse_marker() {
        assert_eq!(
            parse_marker("<!--directive:open:row-->\n"),
            Some(Marker::Open("row".to_owned()))
        );
        assert_eq!(parse_marker("<!--directive:close-->"), Some(Marker::Close));
        assert_eq!(parse_marker("<!-- note -->"), None);
    }

    #[test]
    fn test_container_becomes_markers() {
        let (output, warnings) = process(":::row\ntext\n:::\n");
        assert_eq!(
            output,
            "\n<!--directive:open:row-->\n\ntext\n\n<!--directive:close-->\n\n"
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_label_becomes_paragraph() {
        let (output, _) = process(":::column[Left]\n:::");
        assert_eq!(
            output,
            "\n<!--directive:open:column-->\n\nLeft\n\n\n<!--directive:close-->\n\n"
        );
    }

    #[test]
    fn test_nested_with_longer_outer_fence() {
        let (output, warnings) = process("::::row\n:::column\na\n:::\n::::\n");
        assert_eq!(output.matches(CLOSE_MARKER).count(), 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_short_fence_does_not_close_longer_open() {
        let (output, warnings) = process("::::row\na\n:::\n::::\n");
        assert_eq!(output.matches(CLOSE_MARKER).count(), 1);
        assert!(output.contains("\n:::\n"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("line 3"));
    }

    #[test]
    fn test_markers_inside_code_fence_are_literal() {
        let input = "```\n:::row\n:::\n```\n";
        let (output, warnings) = process(input);
        assert_eq!(output, input);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unclosed_container_is_closed_with_warning() {
        let (output, warnings) = process(":::row\ntext");
        assert!(output.ends_with("<!--directive:close-->\n\n"));
        assert_eq!(
            warnings,
            vec!["unclosed container directive :::row (missing closing :::)".to_owned()]
        );
    }

    #[test]
    fn test_stray_close_stays_literal() {
        let (output, warnings) = process("text\n:::\n");
        assert_eq!(output, "text\n:::\n");
        assert_eq!(
            warnings,
            vec!["line 2: stray ::: with no opening directive".to_owned()]
        );
    }
}
