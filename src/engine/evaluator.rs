//! Expression-tree interpreter.
//!
//! The evaluation context is an explicit value passed down the tree, never a
//! global: predicates build a child context per candidate with that
//! candidate's proximity position and the candidate set's size, so nested
//! sub-expressions observe correctly nested contexts. Every step's output is
//! deduplicated and re-sorted to document order before the next step runs;
//! proximity positions inside a step follow the axis's natural order, which
//! is what makes `preceding::x[1]` the nearest preceding `x` rather than the
//! first in document order.

use smallvec::SmallVec;
use std::collections::HashMap;

use crate::engine::axes::axis_stream;
use crate::engine::functions;
use crate::engine::order::doc_order_distinct;
use crate::error::EvaluationError;
use crate::model::{Navigator, NodeKind};
use crate::parser::ast::{
    Axis, BinaryOp, Expr, KindTest, Literal, NameTest, NodeTest, PathExpr, PathStart, Step,
};
use crate::value::{parse_number, xpath_round, NodeSet, Value};

/// Variable bindings for one evaluation. Built in the consuming builder
/// style; unbound references fail at evaluation time, not compile time.
#[derive(Debug, Clone, Default)]
pub struct Bindings<N> {
    vars: HashMap<String, Value<N>>,
}

impl<N> Bindings<N> {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn bind(mut self, name: impl Into<String>, value: Value<N>) -> Self {
        self.vars.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value<N>> {
        self.vars.get(name)
    }
}

/// The evaluation context: context node, proximity position and size (absent
/// outside steps and predicates), and the variable bindings.
pub struct EvalContext<'a, N> {
    pub node: N,
    pub position: Option<usize>,
    pub size: Option<usize>,
    pub bindings: &'a Bindings<N>,
}

impl<'a, N: Navigator> EvalContext<'a, N> {
    pub fn new(node: N, bindings: &'a Bindings<N>) -> Self {
        Self {
            node,
            position: None,
            size: None,
            bindings,
        }
    }

    fn with_item(&self, node: N, position: usize, size: usize) -> EvalContext<'a, N> {
        EvalContext {
            node,
            position: Some(position),
            size: Some(size),
            bindings: self.bindings,
        }
    }
}

pub fn eval<N: Navigator>(
    expr: &Expr,
    ctx: &EvalContext<'_, N>,
) -> Result<Value<N>, EvaluationError> {
    match expr {
        Expr::Literal(Literal::Number(n)) => Ok(Value::Number(*n)),
        Expr::Literal(Literal::Str(s)) => Ok(Value::String(s.clone())),
        Expr::VarRef(name) => ctx
            .bindings
            .get(name)
            .cloned()
            .ok_or_else(|| EvaluationError::UnboundVariable(name.clone())),
        Expr::ContextItem => Ok(Value::Nodes(NodeSet::from(vec![ctx.node.clone()]))),
        Expr::FunctionCall { name, args } => functions::call(name, args, ctx),
        Expr::Neg(operand) => Ok(Value::Number(-eval(operand, ctx)?.number_value())),
        Expr::Binary { op, lhs, rhs } => eval_binary(*op, lhs, rhs, ctx),
        Expr::Path(path) => eval_path(path, ctx),
        Expr::Filter { source, predicates } => match eval(source, ctx)? {
            Value::Nodes(ns) => {
                let ordered = doc_order_distinct(ns.into_vec());
                let kept = filter_by_predicates(ordered, predicates, ctx)?;
                Ok(Value::Nodes(NodeSet::from(kept)))
            }
            other => Err(EvaluationError::type_mismatch(format!(
                "predicate applied to a {}",
                other.kind_name()
            ))),
        },
    }
}

fn eval_binary<N: Navigator>(
    op: BinaryOp,
    lhs: &Expr,
    rhs: &Expr,
    ctx: &EvalContext<'_, N>,
) -> Result<Value<N>, EvaluationError> {
    match op {
        BinaryOp::Or => {
            if eval(lhs, ctx)?.boolean_value() {
                return Ok(Value::Boolean(true));
            }
            Ok(Value::Boolean(eval(rhs, ctx)?.boolean_value()))
        }
        BinaryOp::And => {
            if !eval(lhs, ctx)?.boolean_value() {
                return Ok(Value::Boolean(false));
            }
            Ok(Value::Boolean(eval(rhs, ctx)?.boolean_value()))
        }
        BinaryOp::Union => {
            let left = eval(lhs, ctx)?;
            let right = eval(rhs, ctx)?;
            match (left, right) {
                (Value::Nodes(l), Value::Nodes(r)) => {
                    let mut all = l.into_vec();
                    all.extend(r);
                    Ok(Value::Nodes(NodeSet::from(doc_order_distinct(all))))
                }
                (l, r) => Err(EvaluationError::type_mismatch(format!(
                    "union requires node-set operands, got {} | {}",
                    l.kind_name(),
                    r.kind_name()
                ))),
            }
        }
        BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            let left = eval(lhs, ctx)?;
            let right = eval(rhs, ctx)?;
            Ok(Value::Boolean(general_compare(op, &left, &right)))
        }
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
            let a = eval(lhs, ctx)?.number_value();
            let b = eval(rhs, ctx)?.number_value();
            let n = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                // Remainder keeps the sign of the dividend.
                _ => a % b,
            };
            Ok(Value::Number(n))
        }
    }
}

// ----- paths ---------------------------------------------------------------

fn eval_path<N: Navigator>(
    path: &PathExpr,
    ctx: &EvalContext<'_, N>,
) -> Result<Value<N>, EvaluationError> {
    let mut current: Vec<N> = match &path.start {
        PathStart::Root => {
            let mut root = ctx.node.clone();
            root.move_to_root();
            vec![root]
        }
        PathStart::Relative => vec![ctx.node.clone()],
        PathStart::Filter(expr) => match eval(expr, ctx)? {
            Value::Nodes(ns) => doc_order_distinct(ns.into_vec()),
            other => {
                return Err(EvaluationError::type_mismatch(format!(
                    "a location step cannot follow a {}",
                    other.kind_name()
                )));
            }
        },
    };

    for step in &path.steps {
        let mut gathered: Vec<N> = Vec::new();
        for origin in &current {
            apply_step(origin, step, ctx, &mut gathered)?;
        }
        current = doc_order_distinct(gathered);
    }
    Ok(Value::Nodes(NodeSet::from(current)))
}

/// Runs one step from one origin node: axis stream, node test, predicates.
/// A leading constant positional predicate short-circuits the axis pull, so
/// `[1]` on a deep descendant axis stops at the first hit.
fn apply_step<N: Navigator>(
    origin: &N,
    step: &Step,
    ctx: &EvalContext<'_, N>,
    out: &mut Vec<N>,
) -> Result<(), EvaluationError> {
    let stream =
        axis_stream(origin, step.axis).filter(|node| matches_test(node, &step.test, step.axis));

    let mut predicates = step.predicates.as_slice();
    let candidates: SmallVec<[N; 8]> = match constant_position(predicates.first()) {
        Some(k) => {
            predicates = &predicates[1..];
            match k {
                Some(index) => stream.skip(index - 1).take(1).collect(),
                // [0], [0.5]: no position ever matches
                None => SmallVec::new(),
            }
        }
        None => stream.collect(),
    };

    let kept = filter_by_predicates(candidates.into_vec(), predicates, ctx)?;
    out.extend(kept);
    Ok(())
}

/// `Some(Some(n))` for a predicate that is the number literal `n` with a
/// usable 1-based value, `Some(None)` for a constant that can never match a
/// position, `None` for anything that needs full evaluation.
fn constant_position(pred: Option<&Expr>) -> Option<Option<usize>> {
    if let Some(Expr::Literal(Literal::Number(n))) = pred {
        if n.fract() == 0.0 && *n >= 1.0 && *n <= usize::MAX as f64 {
            return Some(Some(*n as usize));
        }
        return Some(None);
    }
    None
}

fn filter_by_predicates<N: Navigator>(
    nodes: Vec<N>,
    predicates: &[Expr],
    ctx: &EvalContext<'_, N>,
) -> Result<Vec<N>, EvaluationError> {
    let mut current = nodes;
    for predicate in predicates {
        let size = current.len();
        let mut kept = Vec::with_capacity(size);
        for (index, node) in current.into_iter().enumerate() {
            let child = ctx.with_item(node.clone(), index + 1, size);
            let verdict = eval(predicate, &child)?;
            if predicate_keep(&verdict, index + 1) {
                kept.push(node);
            }
        }
        current = kept;
    }
    Ok(current)
}

/// Numeric predicates are positional; everything else converts to boolean.
fn predicate_keep<N: Navigator>(value: &Value<N>, position: usize) -> bool {
    match value {
        Value::Number(n) => position as f64 == xpath_round(*n),
        other => other.boolean_value(),
    }
}

// ----- node tests ----------------------------------------------------------

pub(crate) fn matches_test<N: Navigator>(node: &N, test: &NodeTest, axis: Axis) -> bool {
    match test {
        NodeTest::Kind(KindTest::AnyNode) => true,
        NodeTest::Kind(KindTest::Text) => node.node_kind() == NodeKind::Text,
        NodeTest::Kind(KindTest::Comment) => node.node_kind() == NodeKind::Comment,
        NodeTest::Kind(KindTest::Pi(target)) => {
            node.node_kind() == NodeKind::ProcessingInstruction
                && target.as_ref().is_none_or(|t| node.local_name() == *t)
        }
        NodeTest::Name(name_test) => {
            // A name test selects only the axis's principal node kind.
            if node.node_kind() != axis.principal_kind() {
                return false;
            }
            match name_test {
                NameTest::Any => true,
                NameTest::AnyLocal(prefix) => node.prefix() == *prefix,
                NameTest::Named { prefix, local } => {
                    node.local_name() == *local
                        && node.prefix() == prefix.as_deref().unwrap_or("")
                }
            }
        }
    }
}

// ----- comparisons ---------------------------------------------------------

/// XPath 1.0 §3.4 general comparison, existential over node-sets: a
/// comparison with a node-set operand holds iff some member satisfies it.
/// `=` and `!=` compare string-values against strings and other node-sets;
/// everything relational goes through numbers; NaN makes any relation false.
fn general_compare<N: Navigator>(op: BinaryOp, lhs: &Value<N>, rhs: &Value<N>) -> bool {
    let equality = matches!(op, BinaryOp::Eq | BinaryOp::Ne);
    match (lhs, rhs) {
        (Value::Nodes(l), Value::Nodes(r)) => {
            if equality {
                let right_values: Vec<String> = r.iter().map(Navigator::string_value).collect();
                l.iter().any(|x| {
                    let xs = x.string_value();
                    right_values.iter().any(|ys| cmp_str(op, &xs, ys))
                })
            } else {
                let right_values: Vec<f64> =
                    r.iter().map(|n| parse_number(&n.string_value())).collect();
                l.iter().any(|x| {
                    let xn = parse_number(&x.string_value());
                    right_values.iter().any(|&yn| cmp_num(op, xn, yn))
                })
            }
        }
        (Value::Nodes(ns), Value::Boolean(b)) => cmp_bool(op, !ns.is_empty(), *b),
        (Value::Boolean(b), Value::Nodes(ns)) => cmp_bool(op, *b, !ns.is_empty()),
        (Value::Nodes(ns), other) => ns.iter().any(|x| cmp_node_scalar(op, x, other, false)),
        (other, Value::Nodes(ns)) => ns.iter().any(|x| cmp_node_scalar(op, x, other, true)),
        (l, r) => {
            if equality {
                match (l, r) {
                    (Value::Boolean(_), _) | (_, Value::Boolean(_)) => {
                        cmp_bool(op, l.boolean_value(), r.boolean_value())
                    }
                    (Value::Number(_), _) | (_, Value::Number(_)) => {
                        cmp_num(op, l.number_value(), r.number_value())
                    }
                    _ => cmp_str(op, &l.string_value(), &r.string_value()),
                }
            } else {
                cmp_num(op, l.number_value(), r.number_value())
            }
        }
    }
}

/// One node against one scalar; `flipped` means the scalar was on the left.
fn cmp_node_scalar<N: Navigator>(op: BinaryOp, node: &N, scalar: &Value<N>, flipped: bool) -> bool {
    let oriented = |op: BinaryOp, a_node: f64, b: f64| {
        if flipped {
            cmp_num(op, b, a_node)
        } else {
            cmp_num(op, a_node, b)
        }
    };
    match scalar {
        Value::String(s) if matches!(op, BinaryOp::Eq | BinaryOp::Ne) => {
            cmp_str(op, &node.string_value(), s)
        }
        other => oriented(op, parse_number(&node.string_value()), other.number_value()),
    }
}

fn cmp_num(op: BinaryOp, a: f64, b: f64) -> bool {
    match op {
        BinaryOp::Eq => a == b,
        BinaryOp::Ne => a != b,
        BinaryOp::Lt => a < b,
        BinaryOp::Le => a <= b,
        BinaryOp::Gt => a > b,
        BinaryOp::Ge => a >= b,
        _ => unreachable!("not a comparison operator"),
    }
}

fn cmp_str(op: BinaryOp, a: &str, b: &str) -> bool {
    match op {
        BinaryOp::Eq => a == b,
        BinaryOp::Ne => a != b,
        _ => unreachable!("relational comparisons go through numbers"),
    }
}

fn cmp_bool(op: BinaryOp, a: bool, b: bool) -> bool {
    match op {
        BinaryOp::Eq => a == b,
        BinaryOp::Ne => a != b,
        // Relational comparison on booleans goes through their numbers.
        _ => cmp_num(op, a as u8 as f64, b as u8 as f64),
    }
}
