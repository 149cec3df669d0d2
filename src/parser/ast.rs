//! Expression tree produced by the parser. Trees are immutable after
//! compilation and carry no navigator state, so a compiled expression can be
//! evaluated concurrently over independent navigators.

use crate::model::NodeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Ancestor,
    AncestorOrSelf,
    Attribute,
    Child,
    Descendant,
    DescendantOrSelf,
    Following,
    FollowingSibling,
    Namespace,
    Parent,
    Preceding,
    PrecedingSibling,
    SelfAxis,
}

impl Axis {
    pub fn from_name(name: &str) -> Option<Axis> {
        Some(match name {
            "ancestor" => Axis::Ancestor,
            "ancestor-or-self" => Axis::AncestorOrSelf,
            "attribute" => Axis::Attribute,
            "child" => Axis::Child,
            "descendant" => Axis::Descendant,
            "descendant-or-self" => Axis::DescendantOrSelf,
            "following" => Axis::Following,
            "following-sibling" => Axis::FollowingSibling,
            "namespace" => Axis::Namespace,
            "parent" => Axis::Parent,
            "preceding" => Axis::Preceding,
            "preceding-sibling" => Axis::PrecedingSibling,
            "self" => Axis::SelfAxis,
            _ => return None,
        })
    }

    /// Reverse axes yield reverse document order; proximity positions inside
    /// predicates count along that order.
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Ancestor | Axis::AncestorOrSelf | Axis::Preceding | Axis::PrecedingSibling
        )
    }

    /// The node kind a name test selects on this axis.
    pub fn principal_kind(self) -> NodeKind {
        match self {
            Axis::Attribute => NodeKind::Attribute,
            Axis::Namespace => NodeKind::Namespace,
            _ => NodeKind::Element,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NameTest {
    /// `*` or `*:*`
    Any,
    /// `prefix:*`
    AnyLocal(String),
    /// `local` or `prefix:local`, prefixes matched literally
    Named {
        prefix: Option<String>,
        local: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum KindTest {
    /// `node()`
    AnyNode,
    /// `text()`
    Text,
    /// `comment()`
    Comment,
    /// `processing-instruction()` with an optional target literal
    Pi(Option<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeTest {
    Name(NameTest),
    Kind(KindTest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Expr>,
}

impl Step {
    /// The `descendant-or-self::node()` step that `//` abbreviates.
    pub fn descendant_or_self() -> Step {
        Step {
            axis: Axis::DescendantOrSelf,
            test: NodeTest::Kind(KindTest::AnyNode),
            predicates: Vec::new(),
        }
    }

    pub fn self_node() -> Step {
        Step {
            axis: Axis::SelfAxis,
            test: NodeTest::Kind(KindTest::AnyNode),
            predicates: Vec::new(),
        }
    }

    pub fn parent_node() -> Step {
        Step {
            axis: Axis::Parent,
            test: NodeTest::Kind(KindTest::AnyNode),
            predicates: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathStart {
    /// `/…` — starts at the document root.
    Root,
    /// Starts at the context node.
    Relative,
    /// `FilterExpr/…` — starts at the node-set the filter evaluates to.
    /// There is no static check; a scalar fails with `TypeMismatch` at
    /// evaluation time.
    Filter(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathExpr {
    pub start: PathStart,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Union,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// `$name`; compiled even when unbound, evaluation fails if unbound.
    VarRef(String),
    /// A lone `.` — the context node as a singleton node-set.
    ContextItem,
    FunctionCall {
        name: String,
        args: Vec<Expr>,
    },
    /// Unary minus.
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Path(PathExpr),
    /// Predicates applied to a primary expression: `(expr)[p]`, `$v[p]`.
    Filter {
        source: Box<Expr>,
        predicates: Vec<Expr>,
    },
}
