//! The node-set function family: context positions, counting, `id()`,
//! name accessors, and `reverse()`.

use crate::engine::axes::axis_stream;
use crate::engine::evaluator::EvalContext;
use crate::error::EvaluationError;
use crate::model::{Navigator, NodeKind};
use crate::parser::ast::Axis;
use crate::value::{NodeSet, Value};

pub(super) fn position<N: Navigator>(
    ctx: &EvalContext<'_, N>,
) -> Result<Value<N>, EvaluationError> {
    match ctx.position {
        Some(p) => Ok(Value::Number(p as f64)),
        None => Err(EvaluationError::ContextlessFunction("position")),
    }
}

pub(super) fn last<N: Navigator>(ctx: &EvalContext<'_, N>) -> Result<Value<N>, EvaluationError> {
    match ctx.size {
        Some(s) => Ok(Value::Number(s as f64)),
        None => Err(EvaluationError::ContextlessFunction("last")),
    }
}

pub(super) fn count<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    let Value::Nodes(ns) = &args[0] else {
        unreachable!("binding coerced the argument");
    };
    Ok(Value::Number(ns.len() as f64))
}

/// DTD-less `id()`: the argument's string-value (each node's string-value
/// for a node-set) is whitespace-tokenized and elements anywhere in the
/// document whose `id` attribute equals one of the tokens are selected, in
/// document order.
pub(super) fn id<N: Navigator>(
    args: &[Value<N>],
    ctx: &EvalContext<'_, N>,
) -> Result<Value<N>, EvaluationError> {
    let mut tokens: Vec<String> = Vec::new();
    match &args[0] {
        Value::Nodes(ns) => {
            for node in ns.iter() {
                tokens.extend(node.string_value().split_whitespace().map(str::to_string));
            }
        }
        other => {
            tokens.extend(other.string_value().split_whitespace().map(str::to_string));
        }
    }

    let mut root = ctx.node.clone();
    root.move_to_root();
    let mut hits = Vec::new();
    for node in axis_stream(&root, Axis::DescendantOrSelf) {
        if node.node_kind() != NodeKind::Element {
            continue;
        }
        for attr in axis_stream(&node, Axis::Attribute) {
            if attr.local_name() == "id" && tokens.iter().any(|t| *t == attr.string_value()) {
                hits.push(node.clone());
                break;
            }
        }
    }
    Ok(Value::Nodes(NodeSet::from(hits)))
}

/// Optional-argument helper shared by the name accessors: the first node of
/// the argument set, or the context node. `None` means the argument set was
/// empty, for which every accessor returns the empty string.
fn target_node<N: Navigator>(args: &[Value<N>], ctx: &EvalContext<'_, N>) -> Option<N> {
    match args.first() {
        Some(Value::Nodes(ns)) => ns.first().cloned(),
        Some(_) => unreachable!("binding coerced the argument"),
        None => Some(ctx.node.clone()),
    }
}

pub(super) fn local_name<N: Navigator>(
    args: &[Value<N>],
    ctx: &EvalContext<'_, N>,
) -> Result<Value<N>, EvaluationError> {
    let out = target_node(args, ctx)
        .map(|n| n.local_name())
        .unwrap_or_default();
    Ok(Value::String(out))
}

pub(super) fn namespace_uri<N: Navigator>(
    args: &[Value<N>],
    ctx: &EvalContext<'_, N>,
) -> Result<Value<N>, EvaluationError> {
    let out = target_node(args, ctx)
        .map(|n| n.namespace_uri())
        .unwrap_or_default();
    Ok(Value::String(out))
}

/// `name()`: the name as written, `prefix:local` when a prefix is present.
pub(super) fn name<N: Navigator>(
    args: &[Value<N>],
    ctx: &EvalContext<'_, N>,
) -> Result<Value<N>, EvaluationError> {
    let out = match target_node(args, ctx) {
        Some(n) => {
            let prefix = n.prefix();
            let local = n.local_name();
            if prefix.is_empty() {
                local
            } else {
                format!("{prefix}:{local}")
            }
        }
        None => String::new(),
    };
    Ok(Value::String(out))
}

pub(super) fn reverse<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    let Value::Nodes(ns) = &args[0] else {
        unreachable!("binding coerced the argument");
    };
    let mut out = ns.clone();
    out.reverse();
    Ok(Value::Nodes(out))
}
