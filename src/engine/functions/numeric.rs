//! `number()`, `sum()`, `floor()`, `ceiling()`, `round()`.

use crate::engine::evaluator::EvalContext;
use crate::error::EvaluationError;
use crate::model::Navigator;
use crate::value::{parse_number, xpath_round, Value};

pub(super) fn number<N: Navigator>(
    args: &[Value<N>],
    ctx: &EvalContext<'_, N>,
) -> Result<Value<N>, EvaluationError> {
    let n = match args.first() {
        Some(v) => v.number_value(),
        None => parse_number(&ctx.node.string_value()),
    };
    Ok(Value::Number(n))
}

pub(super) fn sum<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    let Value::Nodes(ns) = &args[0] else {
        unreachable!("binding coerced the argument");
    };
    let total = ns
        .iter()
        .map(|n| parse_number(&n.string_value()))
        .sum::<f64>();
    Ok(Value::Number(total))
}

pub(super) fn floor<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    Ok(Value::Number(args[0].number_value().floor()))
}

pub(super) fn ceiling<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    Ok(Value::Number(args[0].number_value().ceil()))
}

pub(super) fn round<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    Ok(Value::Number(xpath_round(args[0].number_value())))
}
