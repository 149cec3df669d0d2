//! Simple in-memory tree implementing [`Navigator`], used by tests, docs,
//! and benches.
//!
//! Focus:
//! - Ergonomic builder for quick test tree creation
//! - Identity by allocation, so `is_same_position` is a pointer comparison
//! - No `document_order_hint`, which keeps the engine's ranking walk
//!   exercised by every test that needs document order
//!
//! Example:
//! ```
//! use navpath::simple_node::{attr, doc, elem, text};
//! use navpath::Navigator;
//!
//! // <root id="r"><child>Hello</child><child/></root>
//! let root = doc()
//!     .child(
//!         elem("root")
//!             .attr(attr("id", "r"))
//!             .child(elem("child").child(text("Hello")))
//!             .child(elem("child")),
//!     )
//!     .build();
//!
//! assert_eq!(root.string_value(), "Hello");
//! ```

use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use crate::model::{Navigator, NodeKind, QName};

#[derive(Debug)]
struct Inner {
    kind: NodeKind,
    name: Option<QName>,
    value: Option<String>, // text / attribute / comment / PI content
    parent: RwLock<Option<Weak<Inner>>>,
    attributes: RwLock<Vec<SimpleNode>>,
    namespaces: RwLock<Vec<SimpleNode>>,
    children: RwLock<Vec<SimpleNode>>,
}

/// An Arc-backed node that doubles as its own navigator: the value is the
/// cursor, and cloning snapshots the position.
#[derive(Clone)]
pub struct SimpleNode(Arc<Inner>);

impl fmt::Debug for SimpleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleNode")
            .field("kind", &self.0.kind)
            .field("name", &self.0.name)
            .field("value", &self.0.value)
            .finish()
    }
}

impl SimpleNode {
    fn new(kind: NodeKind, name: Option<QName>, value: Option<String>) -> Self {
        SimpleNode(Arc::new(Inner {
            kind,
            name,
            value,
            parent: RwLock::new(None),
            attributes: RwLock::new(Vec::new()),
            namespaces: RwLock::new(Vec::new()),
            children: RwLock::new(Vec::new()),
        }))
    }

    /// Splits a written name on `:` into prefix and local part. Prefixes are
    /// literal text here, exactly as the engine matches them.
    fn parse_name(name: &str) -> QName {
        match name.split_once(':') {
            Some((prefix, local)) => QName::prefixed(prefix, local),
            None => QName::local(name),
        }
    }

    fn parent_node(&self) -> Option<SimpleNode> {
        self.0
            .parent
            .read()
            .ok()?
            .as_ref()
            .and_then(Weak::upgrade)
            .map(SimpleNode)
    }

    fn index_in<F>(&self, list: F) -> Option<usize>
    where
        F: Fn(&Inner) -> Vec<SimpleNode>,
    {
        let parent = self.parent_node()?;
        list(&parent.0)
            .iter()
            .position(|n| Arc::ptr_eq(&n.0, &self.0))
    }

    fn siblings(&self) -> Vec<SimpleNode> {
        match self.parent_node() {
            Some(p) => p.0.children.read().map(|v| v.clone()).unwrap_or_default(),
            None => Vec::new(),
        }
    }
}

// ----- builder -------------------------------------------------------------

pub struct SimpleNodeBuilder {
    node: SimpleNode,
    pending_children: Vec<SimpleNode>,
    pending_attrs: Vec<SimpleNode>,
    pending_ns: Vec<SimpleNode>,
}

impl SimpleNodeBuilder {
    fn new(kind: NodeKind, name: Option<QName>, value: Option<String>) -> Self {
        Self {
            node: SimpleNode::new(kind, name, value),
            pending_children: Vec::new(),
            pending_attrs: Vec::new(),
            pending_ns: Vec::new(),
        }
    }

    pub fn child(mut self, child: impl Into<SimpleNodeOrBuilder>) -> Self {
        self.pending_children.push(child.into().build());
        self
    }

    pub fn attr(mut self, attr: SimpleNode) -> Self {
        debug_assert!(attr.0.kind == NodeKind::Attribute);
        self.pending_attrs.push(attr);
        self
    }

    pub fn namespace(mut self, ns: SimpleNode) -> Self {
        debug_assert!(ns.0.kind == NodeKind::Namespace);
        self.pending_ns.push(ns);
        self
    }

    pub fn build(self) -> SimpleNode {
        let link = |nodes: &[SimpleNode]| {
            for n in nodes {
                *n.0.parent.write().unwrap() = Some(Arc::downgrade(&self.node.0));
            }
        };
        link(&self.pending_attrs);
        link(&self.pending_ns);
        link(&self.pending_children);
        self.node
            .0
            .attributes
            .write()
            .unwrap()
            .extend(self.pending_attrs);
        self.node
            .0
            .namespaces
            .write()
            .unwrap()
            .extend(self.pending_ns);
        self.node
            .0
            .children
            .write()
            .unwrap()
            .extend(self.pending_children);
        self.node
    }
}

pub enum SimpleNodeOrBuilder {
    Built(SimpleNode),
    Builder(SimpleNodeBuilder),
}

impl SimpleNodeOrBuilder {
    fn build(self) -> SimpleNode {
        match self {
            SimpleNodeOrBuilder::Built(n) => n,
            SimpleNodeOrBuilder::Builder(b) => b.build(),
        }
    }
}

impl From<SimpleNode> for SimpleNodeOrBuilder {
    fn from(n: SimpleNode) -> Self {
        SimpleNodeOrBuilder::Built(n)
    }
}

impl From<SimpleNodeBuilder> for SimpleNodeOrBuilder {
    fn from(b: SimpleNodeBuilder) -> Self {
        SimpleNodeOrBuilder::Builder(b)
    }
}

// Convenience helper functions for concise test code.

pub fn doc() -> SimpleNodeBuilder {
    SimpleNodeBuilder::new(NodeKind::Root, None, None)
}

pub fn elem(name: &str) -> SimpleNodeBuilder {
    SimpleNodeBuilder::new(NodeKind::Element, Some(SimpleNode::parse_name(name)), None)
}

pub fn attr(name: &str, value: &str) -> SimpleNode {
    SimpleNode::new(
        NodeKind::Attribute,
        Some(SimpleNode::parse_name(name)),
        Some(value.to_string()),
    )
}

pub fn text(value: &str) -> SimpleNode {
    SimpleNode::new(NodeKind::Text, None, Some(value.to_string()))
}

pub fn comment(value: &str) -> SimpleNode {
    SimpleNode::new(NodeKind::Comment, None, Some(value.to_string()))
}

pub fn pi(target: &str, data: &str) -> SimpleNode {
    SimpleNode::new(
        NodeKind::ProcessingInstruction,
        Some(QName::local(target)),
        Some(data.to_string()),
    )
}

pub fn ns(prefix: &str, uri: &str) -> SimpleNode {
    SimpleNode::new(
        NodeKind::Namespace,
        Some(QName::local(prefix)),
        Some(uri.to_string()),
    )
}

// ----- navigator -----------------------------------------------------------

impl Navigator for SimpleNode {
    fn node_kind(&self) -> NodeKind {
        self.0.kind
    }

    fn local_name(&self) -> String {
        self.0
            .name
            .as_ref()
            .map(|q| q.local.clone())
            .unwrap_or_default()
    }

    fn prefix(&self) -> String {
        self.0
            .name
            .as_ref()
            .and_then(|q| q.prefix.clone())
            .unwrap_or_default()
    }

    fn namespace_uri(&self) -> String {
        // Prefixes are never resolved in this model; only namespace nodes
        // carry a URI (their value).
        match self.0.kind {
            NodeKind::Namespace => self.0.value.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn string_value(&self) -> String {
        match self.0.kind {
            NodeKind::Element | NodeKind::Root => {
                fn collect(node: &SimpleNode, out: &mut String) {
                    if node.0.kind == NodeKind::Text {
                        if let Some(v) = &node.0.value {
                            out.push_str(v);
                        }
                    }
                    for child in node.0.children.read().unwrap().iter() {
                        collect(child, out);
                    }
                }
                let mut out = String::new();
                collect(self, &mut out);
                out
            }
            _ => self.0.value.clone().unwrap_or_default(),
        }
    }

    fn move_to_parent(&mut self) -> bool {
        match self.parent_node() {
            Some(p) => {
                *self = p;
                true
            }
            None => false,
        }
    }

    fn move_to_first_child(&mut self) -> bool {
        let first = self.0.children.read().unwrap().first().cloned();
        match first {
            Some(c) => {
                *self = c;
                true
            }
            None => false,
        }
    }

    fn move_to_next_sibling(&mut self) -> bool {
        if self.0.kind == NodeKind::Attribute || self.0.kind == NodeKind::Namespace {
            return false;
        }
        let Some(idx) = self.index_in(|p| p.children.read().unwrap().clone()) else {
            return false;
        };
        match self.siblings().get(idx + 1) {
            Some(n) => {
                *self = n.clone();
                true
            }
            None => false,
        }
    }

    fn move_to_previous_sibling(&mut self) -> bool {
        if self.0.kind == NodeKind::Attribute || self.0.kind == NodeKind::Namespace {
            return false;
        }
        let Some(idx) = self.index_in(|p| p.children.read().unwrap().clone()) else {
            return false;
        };
        if idx == 0 {
            return false;
        }
        match self.siblings().get(idx - 1) {
            Some(n) => {
                *self = n.clone();
                true
            }
            None => false,
        }
    }

    fn move_to_first_attribute(&mut self) -> bool {
        let first = self.0.attributes.read().unwrap().first().cloned();
        match first {
            Some(a) => {
                *self = a;
                true
            }
            None => false,
        }
    }

    fn move_to_next_attribute(&mut self) -> bool {
        if self.0.kind != NodeKind::Attribute {
            return false;
        }
        let Some(idx) = self.index_in(|p| p.attributes.read().unwrap().clone()) else {
            return false;
        };
        let next = self
            .parent_node()
            .and_then(|p| p.0.attributes.read().unwrap().get(idx + 1).cloned());
        match next {
            Some(a) => {
                *self = a;
                true
            }
            None => false,
        }
    }

    fn move_to_first_namespace(&mut self) -> bool {
        let first = self.0.namespaces.read().unwrap().first().cloned();
        match first {
            Some(n) => {
                *self = n;
                true
            }
            None => false,
        }
    }

    fn move_to_next_namespace(&mut self) -> bool {
        if self.0.kind != NodeKind::Namespace {
            return false;
        }
        let Some(idx) = self.index_in(|p| p.namespaces.read().unwrap().clone()) else {
            return false;
        };
        let next = self
            .parent_node()
            .and_then(|p| p.0.namespaces.read().unwrap().get(idx + 1).cloned());
        match next {
            Some(n) => {
                *self = n;
                true
            }
            None => false,
        }
    }

    fn move_to_root(&mut self) {
        while self.move_to_parent() {}
    }

    fn is_same_position(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
