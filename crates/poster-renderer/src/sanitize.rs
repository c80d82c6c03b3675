//! Allow-list HTML sanitizer.
//!
//! The tree is serialized, cleaned by an [`ammonia::Builder`] and parsed
//! back. What survives:
//!
//! - Elements in the GitHub tag list. Others are unwrapped, except `script`
//!   and `style`, which are removed with their content.
//! - Attributes allowed globally or for the element. `class` is filtered
//!   token by token against the classes each element may carry.
//! - URL attributes that are relative or use an allowed protocol.
//!
//! `id`, `name` and the ARIA reference attributes get the `user-content-`
//! prefix so they cannot clobber page globals. Comments and raw markup are
//! dropped. Sanitizing already-sanitized output is a no-op.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use ammonia::Builder;
use regex::Regex;

use crate::hast::Node;
use crate::html_sink::parse_fragment;
use crate::stringify::to_html;

const CLOBBER_PREFIX: &str = "user-content-";

static LANGUAGE_CLASS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^language-.").unwrap());

const GITHUB_TAG_NAMES: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "dd", "del", "details", "div", "dl", "dt", "em", "h1",
    "h2", "h3", "h4", "h5", "h6", "hr", "i", "img", "input", "ins", "kbd", "li", "ol", "p",
    "picture", "pre", "q", "rp", "rt", "ruby", "s", "samp", "section", "source", "span", "strike",
    "strong", "sub", "summary", "sup", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "tt",
    "ul", "var",
];

const GLOBAL_ATTRIBUTES: &[&str] = &[
    "abbr",
    "accept",
    "accept-charset",
    "accesskey",
    "action",
    "align",
    "alt",
    "axis",
    "border",
    "cellpadding",
    "cellspacing",
    "char",
    "charoff",
    "charset",
    "checked",
    "clear",
    "colspan",
    "color",
    "cols",
    "compact",
    "coords",
    "datetime",
    "dir",
    "enctype",
    "frame",
    "hspace",
    "headers",
    "height",
    "hreflang",
    "for",
    "id",
    "ismap",
    "itemprop",
    "label",
    "lang",
    "maxlength",
    "media",
    "method",
    "multiple",
    "name",
    "nohref",
    "noshade",
    "nowrap",
    "open",
    "prompt",
    "readonly",
    "rev",
    "rowspan",
    "rows",
    "rules",
    "scope",
    "selected",
    "shape",
    "size",
    "span",
    "start",
    "summary",
    "tabindex",
    "title",
    "usemap",
    "valign",
    "value",
    "width",
];

const TAG_ATTRIBUTES: &[(&str, &[&str])] = &[
    (
        "a",
        &[
            "aria-describedby",
            "aria-label",
            "aria-labelledby",
            "data-footnote-backref",
            "data-footnote-ref",
            "href",
        ],
    ),
    ("blockquote", &["cite"]),
    ("del", &["cite"]),
    ("div", &["itemscope", "itemtype"]),
    ("dl", &["itemscope"]),
    ("img", &["longdesc", "src"]),
    ("input", &["disabled", "type"]),
    ("ins", &["cite"]),
    ("q", &["cite"]),
    ("section", &["data-footnotes"]),
    ("source", &["srcset"]),
];

const HREF_PROTOCOLS: &[&str] = &["http", "https", "irc", "ircs", "mailto", "xmpp"];
const WEB_PROTOCOLS: &[&str] = &["http", "https"];
const POSTER_SRC_PROTOCOLS: &[&str] = &["http", "https", "data"];

type ClassList = &'static [(&'static str, &'static [&'static str])];

const GITHUB_CLASSES: ClassList = &[
    ("a", &["data-footnote-backref"]),
    ("h2", &["sr-only"]),
    ("li", &["task-list-item"]),
    ("ol", &["contains-task-list"]),
    ("section", &["footnotes"]),
    ("ul", &["contains-task-list"]),
];

const POSTER_CLASSES: ClassList = &[
    ("a", &["data-footnote-backref"]),
    ("code", &["math-inline", "math-display"]),
    (
        "div",
        &[
            "poster-section",
            "poster-content",
            "poster-content-row",
            "poster-content-column",
        ],
    ),
    ("h2", &["sr-only"]),
    ("li", &["task-list-item"]),
    ("ol", &["contains-task-list"]),
    ("section", &["footnotes"]),
    ("ul", &["contains-task-list"]),
];

/// Per-element value rules applied through the ammonia attribute filter.
#[derive(Clone, Copy, Debug)]
struct ValuePolicy {
    /// Classes allowed per element. `language-*` is always allowed on `code`.
    classes: ClassList,
    src_protocols: &'static [&'static str],
}

impl ValuePolicy {
    fn filter<'u>(self, element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
        let keep = match attribute {
            "class" => return self.filter_classes(element, value),
            "name" | "aria-describedby" | "aria-labelledby" => return Some(clobber(value)),
            "href" => safe_protocol(value, HREF_PROTOCOLS),
            "cite" | "longdesc" => safe_protocol(value, WEB_PROTOCOLS),
            "src" => safe_protocol(value, self.src_protocols),
            "type" if element == "input" => value == "checkbox",
            _ => true,
        };
        keep.then_some(Cow::Borrowed(value))
    }

    fn filter_classes<'u>(self, element: &str, value: &'u str) -> Option<Cow<'u, str>> {
        let allowed = self
            .classes
            .iter()
            .find(|(tag, _)| *tag == element)
            .map_or(&[][..], |(_, classes)| *classes);
        let tokens: Vec<&str> = value
            .split_whitespace()
            .filter(|token| {
                allowed.contains(token) || (element == "code" && LANGUAGE_CLASS.is_match(token))
            })
            .collect();
        (!tokens.is_empty()).then(|| Cow::Owned(tokens.join(" ")))
    }
}

/// What the sanitizer keeps.
pub struct Schema {
    builder: Builder<'static>,
    policy: ValuePolicy,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Schema {
    /// GitHub-style defaults.
    #[must_use]
    pub fn github() -> Self {
        Self::with_policy(ValuePolicy {
            classes: GITHUB_CLASSES,
            src_protocols: WEB_PROTOCOLS,
        })
    }

    /// GitHub defaults plus math and layout classes and `data:` images.
    #[must_use]
    pub fn poster() -> Self {
        Self::with_policy(ValuePolicy {
            classes: POSTER_CLASSES,
            src_protocols: POSTER_SRC_PROTOCOLS,
        })
    }

    fn with_policy(policy: ValuePolicy) -> Self {
        let tag_attributes: HashMap<&str, HashSet<&str>> = TAG_ATTRIBUTES
            .iter()
            .map(|&(tag, attrs)| (tag, attrs.iter().copied().collect()))
            .collect();
        let url_schemes = HREF_PROTOCOLS
            .iter()
            .chain(policy.src_protocols)
            .copied()
            .collect();

        let mut builder = Builder::default();
        builder
            .tags(GITHUB_TAG_NAMES.iter().copied().collect())
            .clean_content_tags(HashSet::from(["script", "style"]))
            .generic_attributes(GLOBAL_ATTRIBUTES.iter().copied().chain(["class"]).collect())
            .tag_attributes(tag_attributes)
            .url_schemes(url_schemes)
            .link_rel(None)
            .strip_comments(true)
            .id_prefix(Some(CLOBBER_PREFIX))
            .attribute_filter(move |element, attribute, value| {
                policy.filter(element, attribute, value)
            });

        Self { builder, policy }
    }
}

/// Sanitize a tree against a schema.
///
/// ```
/// use poster_renderer::{Element, Node, Schema, sanitize, to_html};
///
/// let nodes = vec![
///     Element::new("p")
///         .with_attr("onclick", "steal()")
///         .with_child(Element::new("script").with_child(Node::text("x")))
///         .with_child(Node::text("ok"))
///         .into(),
/// ];
/// assert_eq!(to_html(&sanitize(nodes, &Schema::poster())), "<p>ok</p>");
/// ```
#[must_use]
pub fn sanitize(mut nodes: Vec<Node>, schema: &Schema) -> Vec<Node> {
    drop_raw(&mut nodes);
    let cleaned = schema.builder.clean(&to_html(&nodes)).to_string();
    parse_fragment(&cleaned)
}

/// Raw markup would be parsed as real elements; it never reaches the cleaner.
fn drop_raw(nodes: &mut Vec<Node>) {
    nodes.retain(|node| !matches!(node, Node::Raw(_)));
    for node in nodes {
        if let Some(element) = node.as_element_mut() {
            drop_raw(&mut element.children);
        }
    }
}

fn clobber(value: &str) -> Cow<'_, str> {
    if value.starts_with(CLOBBER_PREFIX) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("{CLOBBER_PREFIX}{value}"))
    }
}

/// Check if a URL is relative or uses one of `protocols`.
fn safe_protocol(value: &str, protocols: &[&str]) -> bool {
    let Some(colon) = value.find(':') else {
        return true;
    };
    let before_colon = |c: char| value.find(c).is_some_and(|i| i < colon);
    if before_colon('/') || before_colon('?') || before_colon('#') {
        return true;
    }
    let scheme = value[..colon].to_ascii_lowercase();
    protocols.contains(&scheme.as_str())
}
