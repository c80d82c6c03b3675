//! Container directive line parsing: `:::name[label]{attrs}` and `:::`.

/// A line that opens or closes a container directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ContainerLine {
    /// `:::name[label]{attrs}`. Attributes are accepted and discarded.
    Open {
        name: String,
        label: Option<String>,
        colons: usize,
    },
    /// A line of three or more colons.
    Close { colons: usize },
}

/// Parse a whole line as a container directive fence.
///
/// Returns `None` for anything else, including lines indented by four or
/// more spaces (indented code) and names with invalid characters.
pub(crate) fn parse_container_line(line: &str) -> Option<ContainerLine> {
    let line = line.trim_end();
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent >= 4 {
        return None;
    }
    let trimmed = line.trim_start();

    let colons = trimmed.chars().take_while(|&c| c == ':').count();
    if colons < 3 {
        return None;
    }

    let rest = trimmed[colons..].trim_start();
    if rest.is_empty() {
        return Some(ContainerLine::Close { colons });
    }

    let name_end = rest
        .find(|c: char| c == '[' || c == '{' || c.is_whitespace())
        .unwrap_or(rest.len());
    let name = &rest[..name_end];
    if !is_valid_name(name) {
        return None;
    }

    let after_name = &rest[name_end..];
    let (label, consumed) = match balanced(after_name, '[', ']') {
        Some(label) => (Some(label.to_owned()), label.len() + 2),
        None => (None, 0),
    };
    let after_label = &after_name[consumed..];
    let consumed = balanced(after_label, '{', '}').map_or(0, |attrs| attrs.len() + 2);

    // Only whitespace may follow the label and attributes.
    if !after_label[consumed..].trim().is_empty() {
        return None;
    }

    Some(ContainerLine::Open {
        name: name.to_owned(),
        label: label.filter(|l| !l.trim().is_empty()),
        colons,
    })
}

/// Names start with a letter and contain letters, digits, `-` or `_`.
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(char::is_alphabetic)
        && chars.all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Content between a leading `open` and its matching `close`, with nesting.
fn balanced(s: &str, open: char, close: char) -> Option<&str> {
    if !s.starts_with(open) {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(&s[open.len_utf8()..i]);
            }
        }
    }
    None
}
