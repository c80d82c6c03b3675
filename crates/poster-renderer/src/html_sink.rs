//! html5ever tree sink producing [`Node`] trees.
//!
//! Markup is parsed as the body of a full document and the body's children
//! are returned, so the result is what a browser would build for the same
//! fragment.

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::driver::ParseOpts;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, Namespace, QualName, local_name, ns, parse_document};

use crate::hast::{Element, Node};

/// Parse an HTML fragment.
pub(crate) fn parse_fragment(html: &str) -> Vec<Node> {
    let document = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    parse_document(FragmentSink::default(), ParseOpts::default())
        .from_utf8()
        .one(document.as_bytes())
}

type Handle = usize;

const DOCUMENT: Handle = 0;

#[derive(Debug)]
enum SinkData {
    Document,
    Element {
        name: QualName,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    /// Comments and processing instructions.
    Ignored,
}

#[derive(Debug)]
struct SinkNode {
    data: SinkData,
    parent: Option<Handle>,
    children: Vec<Handle>,
}

impl SinkNode {
    fn new(data: SinkData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Element name handed to the tree builder.
#[derive(Debug)]
struct SinkName(QualName);

impl ElemName for SinkName {
    fn ns(&self) -> &Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// Arena of parsed nodes; index 0 is the document.
struct FragmentSink {
    nodes: RefCell<Vec<SinkNode>>,
}

impl Default for FragmentSink {
    fn default() -> Self {
        Self {
            nodes: RefCell::new(vec![SinkNode::new(SinkData::Document)]),
        }
    }
}

impl FragmentSink {
    fn create(&self, data: SinkData) -> Handle {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(SinkNode::new(data));
        nodes.len() - 1
    }

    fn insert(&self, parent: Handle, index: usize, child: NodeOrText<Handle>) {
        let mut nodes = self.nodes.borrow_mut();
        let child = match child {
            NodeOrText::AppendNode(child) => child,
            NodeOrText::AppendText(text) => {
                // Text merges into a preceding text sibling.
                let prev = index
                    .checked_sub(1)
                    .and_then(|i| nodes[parent].children.get(i).copied());
                if let Some(prev) = prev
                    && let SinkData::Text(existing) = &mut nodes[prev].data
                {
                    existing.push_str(&text);
                    return;
                }
                nodes.push(SinkNode::new(SinkData::Text(text.to_string())));
                nodes.len() - 1
            }
        };
        nodes[child].parent = Some(parent);
        nodes[parent].children.insert(index, child);
    }

    fn position(&self, node: Handle) -> Option<(Handle, usize)> {
        let nodes = self.nodes.borrow();
        let parent = nodes[node].parent?;
        let index = nodes[parent].children.iter().position(|&c| c == node)?;
        Some((parent, index))
    }

    fn body(&self) -> Option<Handle> {
        let nodes = self.nodes.borrow();
        let child_named = |parent: Handle, tag: LocalName| {
            nodes[parent].children.iter().copied().find(|&c| {
                matches!(&nodes[c].data, SinkData::Element { name, .. } if name.local == tag)
            })
        };
        let html = child_named(DOCUMENT, local_name!("html"))?;
        child_named(html, local_name!("body"))
    }

    fn convert(nodes: &mut [SinkNode], handle: Handle) -> Option<Node> {
        let data = std::mem::replace(&mut nodes[handle].data, SinkData::Ignored);
        match data {
            SinkData::Text(text) => Some(Node::Text(text)),
            SinkData::Element { name, attrs } => {
                let children = std::mem::take(&mut nodes[handle].children)
                    .into_iter()
                    .filter_map(|child| Self::convert(nodes, child))
                    .collect();
                Some(Node::Element(Element {
                    tag: name.local.to_string(),
                    attrs,
                    children,
                }))
            }
            SinkData::Document | SinkData::Ignored => None,
        }
    }
}

impl TreeSink for FragmentSink {
    type Handle = Handle;
    type Output = Vec<Node>;
    type ElemName<'a>
        = SinkName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        let Some(body) = self.body() else {
            return Vec::new();
        };
        let mut nodes = self.nodes.into_inner();
        let children = std::mem::take(&mut nodes[body].children);
        children
            .into_iter()
            .filter_map(|child| Self::convert(&mut nodes, child))
            .collect()
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {}

    fn get_document(&self) -> Self::Handle {
        DOCUMENT
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        match &self.nodes.borrow()[*target].data {
            SinkData::Element { name, .. } => SinkName(name.clone()),
            _ => SinkName(QualName::new(None, ns!(), local_name!(""))),
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        self.create(SinkData::Element { name, attrs })
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        self.create(SinkData::Ignored)
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        self.create(SinkData::Ignored)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let index = self.nodes.borrow()[*parent].children.len();
        self.insert(*parent, index, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if self.nodes.borrow()[*element].parent.is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        if let Some((parent, index)) = self.position(*sibling) {
            self.insert(parent, index, new_node);
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut nodes = self.nodes.borrow_mut();
        if let SinkData::Element { attrs: existing, .. } = &mut nodes[*target].data {
            for attr in attrs {
                let name = attr.name.local.to_string();
                if !existing.iter().any(|(key, _)| *key == name) {
                    existing.push((name, attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        let Some((parent, index)) = self.position(*target) else {
            return;
        };
        let mut nodes = self.nodes.borrow_mut();
        nodes[parent].children.remove(index);
        nodes[*target].parent = None;
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut nodes = self.nodes.borrow_mut();
        let children = std::mem::take(&mut nodes[*node].children);
        for &child in &children {
            nodes[child].parent = Some(*new_parent);
        }
        nodes[*new_parent].children.extend(children);
    }
}
