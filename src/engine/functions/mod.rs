//! Built-in function registry and argument binding.
//!
//! The registry is a read-only table mapping names to descriptors; each
//! descriptor carries the arity range, the declared argument coercions, the
//! declared result kind, and a dispatch tag with one variant per built-in.
//! Arguments are coerced to their declared kind at call time, before the
//! implementation runs; the last coercion repeats for variadic tails
//! (`concat`). Hosts cannot register functions: an unknown name is an
//! evaluation error, not an extension point.

pub(crate) mod boolean;
pub(crate) mod nodeset;
pub(crate) mod numeric;
pub(crate) mod strings;

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::engine::evaluator::{eval, EvalContext};
use crate::error::EvaluationError;
use crate::model::Navigator;
use crate::parser::ast::Expr;
use crate::value::Value;

/// Declared argument kind; drives the call-time coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArgKind {
    /// Passed through unconverted.
    Any,
    Str,
    Num,
    Bool,
    /// Must already be a node-set; scalars are a `TypeMismatch`.
    Nodes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReturnKind {
    Boolean,
    Number,
    Str,
    Nodes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Last,
    Position,
    Count,
    Id,
    LocalName,
    NamespaceUri,
    Name,
    String,
    Concat,
    StartsWith,
    Contains,
    SubstringBefore,
    SubstringAfter,
    Substring,
    StringLength,
    NormalizeSpace,
    Translate,
    Boolean,
    Not,
    True,
    False,
    Number,
    Sum,
    Floor,
    Ceiling,
    Round,
    EndsWith,
    LowerCase,
    UpperCase,
    Matches,
    Replace,
    Reverse,
    StringJoin,
}

pub(crate) struct Descriptor {
    pub min_args: usize,
    /// `None` means variadic.
    pub max_args: Option<usize>,
    pub returns: ReturnKind,
    pub coercions: &'static [ArgKind],
    pub builtin: Builtin,
}

macro_rules! desc {
    ($min:expr, $max:expr, $ret:ident, $coerce:expr, $builtin:ident) => {
        Descriptor {
            min_args: $min,
            max_args: $max,
            returns: ReturnKind::$ret,
            coercions: $coerce,
            builtin: Builtin::$builtin,
        }
    };
}

static TABLE: Lazy<HashMap<&'static str, Descriptor>> = Lazy::new(|| {
    use ArgKind::{Any, Bool, Nodes, Num, Str};
    HashMap::from([
        // node-set
        ("last", desc!(0, Some(0), Number, &[], Last)),
        ("position", desc!(0, Some(0), Number, &[], Position)),
        ("count", desc!(1, Some(1), Number, &[Nodes], Count)),
        ("id", desc!(1, Some(1), Nodes, &[Any], Id)),
        ("local-name", desc!(0, Some(1), Str, &[Nodes], LocalName)),
        ("namespace-uri", desc!(0, Some(1), Str, &[Nodes], NamespaceUri)),
        ("name", desc!(0, Some(1), Str, &[Nodes], Name)),
        // string
        ("string", desc!(0, Some(1), Str, &[Any], String)),
        ("concat", desc!(2, None, Str, &[Str], Concat)),
        ("starts-with", desc!(2, Some(2), Boolean, &[Str, Str], StartsWith)),
        ("contains", desc!(2, Some(2), Boolean, &[Str, Str], Contains)),
        ("substring-before", desc!(2, Some(2), Str, &[Str, Str], SubstringBefore)),
        ("substring-after", desc!(2, Some(2), Str, &[Str, Str], SubstringAfter)),
        ("substring", desc!(2, Some(3), Str, &[Str, Num, Num], Substring)),
        ("string-length", desc!(0, Some(1), Number, &[Str], StringLength)),
        ("normalize-space", desc!(0, Some(1), Str, &[Str], NormalizeSpace)),
        ("translate", desc!(3, Some(3), Str, &[Str, Str, Str], Translate)),
        // boolean
        ("boolean", desc!(1, Some(1), Boolean, &[Any], Boolean)),
        ("not", desc!(1, Some(1), Boolean, &[Bool], Not)),
        ("true", desc!(0, Some(0), Boolean, &[], True)),
        ("false", desc!(0, Some(0), Boolean, &[], False)),
        // number
        ("number", desc!(0, Some(1), Number, &[Any], Number)),
        ("sum", desc!(1, Some(1), Number, &[Nodes], Sum)),
        ("floor", desc!(1, Some(1), Number, &[Num], Floor)),
        ("ceiling", desc!(1, Some(1), Number, &[Num], Ceiling)),
        ("round", desc!(1, Some(1), Number, &[Num], Round)),
        // extensions carried over from the original engine
        ("ends-with", desc!(2, Some(2), Boolean, &[Str, Str], EndsWith)),
        ("lower-case", desc!(1, Some(1), Str, &[Str], LowerCase)),
        ("upper-case", desc!(1, Some(1), Str, &[Str], UpperCase)),
        ("matches", desc!(2, Some(2), Boolean, &[Str, Str], Matches)),
        ("replace", desc!(3, Some(3), Str, &[Str, Str, Str], Replace)),
        ("reverse", desc!(1, Some(1), Nodes, &[Nodes], Reverse)),
        ("string-join", desc!(2, Some(2), Str, &[Nodes, Str], StringJoin)),
    ])
});

/// Resolves, binds, and invokes a built-in.
pub(crate) fn call<N: Navigator>(
    name: &str,
    args: &[Expr],
    ctx: &EvalContext<'_, N>,
) -> Result<Value<N>, EvaluationError> {
    let Some(desc) = TABLE.get(name) else {
        return Err(EvaluationError::UnknownFunction(name.to_string()));
    };
    let got = args.len();
    if got < desc.min_args || desc.max_args.is_some_and(|max| got > max) {
        return Err(EvaluationError::ArgumentCount {
            function: name.to_string(),
            expected: describe_arity(desc),
            got,
        });
    }

    let mut values = Vec::with_capacity(got);
    for (i, arg) in args.iter().enumerate() {
        let raw = eval(arg, ctx)?;
        values.push(bind(raw, coercion_at(desc, i), name)?);
    }

    let result = dispatch(desc.builtin, &values, ctx)?;
    debug_assert!(
        matches!(
            (&result, desc.returns),
            (Value::Boolean(_), ReturnKind::Boolean)
                | (Value::Number(_), ReturnKind::Number)
                | (Value::String(_), ReturnKind::Str)
                | (Value::Nodes(_), ReturnKind::Nodes)
        ),
        "{name}() produced a value of the wrong kind"
    );
    Ok(result)
}

fn describe_arity(desc: &Descriptor) -> String {
    match desc.max_args {
        Some(max) if max == desc.min_args => format!("{max}"),
        Some(max) => format!("{} to {max}", desc.min_args),
        None => format!("at least {}", desc.min_args),
    }
}

fn coercion_at(desc: &Descriptor, index: usize) -> ArgKind {
    desc.coercions
        .get(index)
        .or(desc.coercions.last())
        .copied()
        .unwrap_or(ArgKind::Any)
}

fn bind<N: Navigator>(
    value: Value<N>,
    kind: ArgKind,
    function: &str,
) -> Result<Value<N>, EvaluationError> {
    Ok(match kind {
        ArgKind::Any => value,
        ArgKind::Str => Value::String(value.string_value()),
        ArgKind::Num => Value::Number(value.number_value()),
        ArgKind::Bool => Value::Boolean(value.boolean_value()),
        ArgKind::Nodes => {
            if value.is_node_set() {
                value
            } else {
                return Err(EvaluationError::type_mismatch(format!(
                    "{function}() expects a node-set argument, got a {}",
                    value.kind_name()
                )));
            }
        }
    })
}

fn dispatch<N: Navigator>(
    builtin: Builtin,
    args: &[Value<N>],
    ctx: &EvalContext<'_, N>,
) -> Result<Value<N>, EvaluationError> {
    match builtin {
        Builtin::Last => nodeset::last(ctx),
        Builtin::Position => nodeset::position(ctx),
        Builtin::Count => nodeset::count(args),
        Builtin::Id => nodeset::id(args, ctx),
        Builtin::LocalName => nodeset::local_name(args, ctx),
        Builtin::NamespaceUri => nodeset::namespace_uri(args, ctx),
        Builtin::Name => nodeset::name(args, ctx),
        Builtin::Reverse => nodeset::reverse(args),
        Builtin::String => strings::string(args, ctx),
        Builtin::Concat => strings::concat(args),
        Builtin::StartsWith => strings::starts_with(args),
        Builtin::Contains => strings::contains(args),
        Builtin::EndsWith => strings::ends_with(args),
        Builtin::SubstringBefore => strings::substring_before(args),
        Builtin::SubstringAfter => strings::substring_after(args),
        Builtin::Substring => strings::substring(args),
        Builtin::StringLength => strings::string_length(args, ctx),
        Builtin::NormalizeSpace => strings::normalize_space(args, ctx),
        Builtin::Translate => strings::translate(args),
        Builtin::LowerCase => strings::lower_case(args),
        Builtin::UpperCase => strings::upper_case(args),
        Builtin::Matches => strings::matches(args),
        Builtin::Replace => strings::replace(args),
        Builtin::StringJoin => strings::string_join(args),
        Builtin::Boolean => boolean::boolean(args),
        Builtin::Not => boolean::not(args),
        Builtin::True => boolean::true_(),
        Builtin::False => boolean::false_(),
        Builtin::Number => numeric::number(args, ctx),
        Builtin::Sum => numeric::sum(args),
        Builtin::Floor => numeric::floor(args),
        Builtin::Ceiling => numeric::ceiling(args),
        Builtin::Round => numeric::round(args),
    }
}
