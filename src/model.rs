//! Node model consumed by the engine: node kinds, literal names, and the
//! cursor-style [`Navigator`] trait every document representation adapts to.

/// The seven node kinds a navigator position can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
    Namespace,
}

/// A qualified name as written in the document or expression.
///
/// Prefixes are literal text: the engine never resolves them against
/// namespace bindings, so `ns:x` matches exactly the nodes whose prefix is
/// `ns` and local name is `x`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
}

impl QName {
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    pub fn prefixed(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            local: local.into(),
        }
    }

    /// The name as written: `prefix:local` or bare `local`.
    pub fn as_written(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}:{}", p, self.local),
            None => self.local.clone(),
        }
    }
}

/// A movable cursor over a tree document.
///
/// A navigator owns exactly one position at a time; the engine holds
/// navigators by value and clones whenever it must remember a position.
/// Movement methods return `false` and leave the position unchanged when the
/// requested move does not exist.
///
/// Attribute positions are reachable only through the attribute moves; the
/// engine never walks the sibling axes from an attribute. The namespace
/// moves are an optional capability and default to "no namespace nodes".
pub trait Navigator: Clone {
    fn node_kind(&self) -> NodeKind;

    /// Local part of the node name; empty for root, text, and comment nodes.
    fn local_name(&self) -> String;

    /// Literal namespace prefix; empty when the name has none.
    fn prefix(&self) -> String;

    /// Declared namespace URI; empty when unknown to the document model.
    fn namespace_uri(&self) -> String;

    /// The XPath string-value: concatenated descendant text for elements and
    /// the root, node data otherwise.
    fn string_value(&self) -> String;

    fn move_to_parent(&mut self) -> bool;
    fn move_to_first_child(&mut self) -> bool;
    fn move_to_next_sibling(&mut self) -> bool;
    fn move_to_previous_sibling(&mut self) -> bool;
    fn move_to_first_attribute(&mut self) -> bool;
    fn move_to_next_attribute(&mut self) -> bool;

    fn move_to_first_namespace(&mut self) -> bool {
        false
    }

    fn move_to_next_namespace(&mut self) -> bool {
        false
    }

    /// Reposition on the document root.
    fn move_to_root(&mut self);

    /// Adopt the position of another navigator over the same document.
    fn move_to(&mut self, other: &Self) {
        *self = other.clone();
    }

    /// Position identity, not value equality.
    fn is_same_position(&self, other: &Self) -> bool;

    /// Optional document-order rank. When every node in a set reports a
    /// rank, ordering and deduplication skip the ranking walk entirely.
    fn document_order_hint(&self) -> Option<u64> {
        None
    }
}
