//! `boolean()`, `not()`, `true()`, `false()`.

use crate::error::EvaluationError;
use crate::model::Navigator;
use crate::value::Value;

pub(super) fn boolean<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    Ok(Value::Boolean(args[0].boolean_value()))
}

pub(super) fn not<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    Ok(Value::Boolean(!args[0].boolean_value()))
}

pub(super) fn true_<N: Navigator>() -> Result<Value<N>, EvaluationError> {
    Ok(Value::Boolean(true))
}

pub(super) fn false_<N: Navigator>() -> Result<Value<N>, EvaluationError> {
    Ok(Value::Boolean(false))
}
