//! GFM literal autolinks.
//!
//! Bare `https://…`, `http://…` and `www.…` URLs and email addresses in
//! running text become links. Text already inside a link is left alone.

use std::sync::LazyLock;

use regex::Regex;

use super::MdNode;

static LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<url>(?:https?://|www\.)[^\s<]+)|(?P<email>[a-z0-9._+-]+@[a-z0-9-]+(?:\.[a-z0-9_-]+)+)",
    )
    .unwrap()
});

/// Split text nodes into text and links, recursively.
pub(super) fn link_literals(nodes: &mut Vec<MdNode>) {
    let mut out = Vec::with_capacity(nodes.len());

    for node in std::mem::take(nodes) {
        match node {
            MdNode::Text(text) => split_text(&text, &mut out),
            link @ MdNode::Link { .. } => out.push(link),
            mut other => {
                if let Some(children) = other.children_mut() {
                    link_literals(children);
                }
                out.push(other);
            }
        }
    }

    *nodes = out;
}

fn split_text(text: &str, out: &mut Vec<MdNode>) {
    let mut last = 0;

    for captures in LITERAL.captures_iter(text) {
        let Some(found) = captures.get(0) else {
            continue;
        };
        if found.start() < last || !starts_literal(text, found.start()) {
            continue;
        }

        let is_email = captures.name("email").is_some();
        let literal = trim_trailing(found.as_str(), is_email);
        if literal.is_empty() || (literal.ends_with("www.") && !is_email) {
            continue;
        }

        if found.start() > last {
            out.push(MdNode::Text(text[last..found.start()].to_owned()));
        }
        out.push(MdNode::Link {
            url: destination(literal, is_email),
            title: String::new(),
            children: vec![MdNode::Text(literal.to_owned())],
        });
        last = found.start() + literal.len();
    }

    if last < text.len() {
        out.push(MdNode::Text(text[last..].to_owned()));
    }
}

/// Literals start the text or follow whitespace or one of `*_~(`.
fn starts_literal(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_none_or(|c| c.is_whitespace() || matches!(c, '*' | '_' | '~' | '('))
}

fn trim_trailing(mut literal: &str, is_email: bool) -> &str {
    loop {
        let Some(last) = literal.chars().next_back() else {
            return literal;
        };
        let trim = match last {
            '?' | '!' | '.' | ',' | ':' | '*' | '_' | '~' | '\'' | '"' => true,
            ')' => literal.matches(')').count() > literal.matches('(').count(),
            '-' => is_email,
            _ => false,
        };
        if !trim {
            return literal;
        }
        literal = &literal[..literal.len() - last.len_utf8()];
    }
}

fn destination(literal: &str, is_email: bool) -> String {
    if is_email {
        format!("mailto:{literal}")
    } else if literal.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("www.")) {
        format!("http://{literal}")
    } else {
        literal.to_owned()
    }
}
