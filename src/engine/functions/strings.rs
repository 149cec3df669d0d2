//! The string function family, including the regex extensions.
//!
//! `matches()` and `replace()` delegate to `fancy-regex`; the pattern
//! language is that engine's (Perl-style with backreferences), not XML
//! Schema regular expressions. Pattern errors surface as
//! [`EvaluationError::InvalidPattern`].

use crate::engine::evaluator::EvalContext;
use crate::error::EvaluationError;
use crate::model::Navigator;
use crate::value::{xpath_round, Value};

fn as_str<N: Navigator>(v: &Value<N>) -> &str {
    match v {
        Value::String(s) => s,
        _ => unreachable!("binding coerced the argument"),
    }
}

fn as_num<N: Navigator>(v: &Value<N>) -> f64 {
    match v {
        Value::Number(n) => *n,
        _ => unreachable!("binding coerced the argument"),
    }
}

/// Optional-argument helper: the explicit string, or the context node's
/// string-value.
fn arg_or_context<N: Navigator>(args: &[Value<N>], ctx: &EvalContext<'_, N>) -> String {
    match args.first() {
        Some(v) => as_str(v).to_string(),
        None => ctx.node.string_value(),
    }
}

pub(super) fn string<N: Navigator>(
    args: &[Value<N>],
    ctx: &EvalContext<'_, N>,
) -> Result<Value<N>, EvaluationError> {
    Ok(Value::String(arg_or_context(args, ctx)))
}

pub(super) fn concat<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    let mut out = String::new();
    for arg in args {
        out.push_str(as_str(arg));
    }
    Ok(Value::String(out))
}

pub(super) fn starts_with<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    Ok(Value::Boolean(as_str(&args[0]).starts_with(as_str(&args[1]))))
}

pub(super) fn ends_with<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    Ok(Value::Boolean(as_str(&args[0]).ends_with(as_str(&args[1]))))
}

pub(super) fn contains<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    Ok(Value::Boolean(as_str(&args[0]).contains(as_str(&args[1]))))
}

pub(super) fn substring_before<N: Navigator>(
    args: &[Value<N>],
) -> Result<Value<N>, EvaluationError> {
    let haystack = as_str(&args[0]);
    let needle = as_str(&args[1]);
    let out = haystack
        .find(needle)
        .map(|i| haystack[..i].to_string())
        .unwrap_or_default();
    Ok(Value::String(out))
}

pub(super) fn substring_after<N: Navigator>(
    args: &[Value<N>],
) -> Result<Value<N>, EvaluationError> {
    let haystack = as_str(&args[0]);
    let needle = as_str(&args[1]);
    let out = haystack
        .find(needle)
        .map(|i| haystack[i + needle.len()..].to_string())
        .unwrap_or_default();
    Ok(Value::String(out))
}

/// `substring(s, start, len?)` with the original engine's index handling:
/// both numbers are rounded, a NaN in either yields the empty string, and
/// the rounded start is clamped to 1 before `len` characters are taken.
/// `substring("abc", 0, 2)` is `"ab"`, `substring("abc", -1, 2)` is `"ab"`,
/// `substring("abc", 1.5, 2.6)` is `"bc"`. Total on every finite input;
/// positions are counted in characters, never bytes.
pub(super) fn substring<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    let s = as_str(&args[0]);
    let start = as_num(&args[1]);
    if start.is_nan() {
        return Ok(Value::String(String::new()));
    }
    let begin = xpath_round(start).max(1.0);
    let end = match args.get(2) {
        Some(len) => {
            let len = as_num(len);
            if len.is_nan() {
                return Ok(Value::String(String::new()));
            }
            begin + xpath_round(len)
        }
        None => f64::INFINITY,
    };
    if end <= begin || begin.is_infinite() {
        return Ok(Value::String(String::new()));
    }
    let skip = begin as usize - 1;
    let out: String = if end.is_infinite() {
        s.chars().skip(skip).collect()
    } else {
        s.chars().skip(skip).take((end - begin) as usize).collect()
    };
    Ok(Value::String(out))
}

pub(super) fn string_length<N: Navigator>(
    args: &[Value<N>],
    ctx: &EvalContext<'_, N>,
) -> Result<Value<N>, EvaluationError> {
    let s = arg_or_context(args, ctx);
    Ok(Value::Number(s.chars().count() as f64))
}

pub(super) fn normalize_space<N: Navigator>(
    args: &[Value<N>],
    ctx: &EvalContext<'_, N>,
) -> Result<Value<N>, EvaluationError> {
    let s = arg_or_context(args, ctx);
    Ok(Value::String(
        s.split_whitespace().collect::<Vec<_>>().join(" "),
    ))
}

/// `translate(s, from, to)`: replace each character of `s` found in `from`
/// with the character at the same index of `to`, or drop it when `to` is
/// shorter. The first occurrence in `from` wins for repeated characters.
pub(super) fn translate<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    let from: Vec<char> = as_str(&args[1]).chars().collect();
    let to: Vec<char> = as_str(&args[2]).chars().collect();
    let mut out = String::new();
    for c in as_str(&args[0]).chars() {
        match from.iter().position(|&f| f == c) {
            Some(i) => {
                if let Some(&r) = to.get(i) {
                    out.push(r);
                }
            }
            None => out.push(c),
        }
    }
    Ok(Value::String(out))
}

pub(super) fn lower_case<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    Ok(Value::String(as_str(&args[0]).to_lowercase()))
}

pub(super) fn upper_case<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    Ok(Value::String(as_str(&args[0]).to_uppercase()))
}

fn compile_pattern(pattern: &str) -> Result<fancy_regex::Regex, EvaluationError> {
    fancy_regex::Regex::new(pattern).map_err(|e| EvaluationError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

pub(super) fn matches<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    let text = as_str(&args[0]);
    let pattern = as_str(&args[1]);
    let re = compile_pattern(pattern)?;
    let hit = re
        .is_match(text)
        .map_err(|e| EvaluationError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
    Ok(Value::Boolean(hit))
}

pub(super) fn replace<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    let text = as_str(&args[0]);
    let pattern = as_str(&args[1]);
    let replacement = as_str(&args[2]);
    let re = compile_pattern(pattern)?;
    Ok(Value::String(re.replace_all(text, replacement).into_owned()))
}

pub(super) fn string_join<N: Navigator>(args: &[Value<N>]) -> Result<Value<N>, EvaluationError> {
    let Value::Nodes(ns) = &args[0] else {
        unreachable!("binding coerced the argument");
    };
    let separator = as_str(&args[1]);
    let parts: Vec<String> = ns.iter().map(Navigator::string_value).collect();
    Ok(Value::String(parts.join(separator)))
}
