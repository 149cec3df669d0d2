//! Error taxonomy: compile-time [`SyntaxError`] and run-time
//! [`EvaluationError`]. The engine returns exactly one of value or error and
//! never panics on any input.

/// Rejection by the lexer or parser. `position` is a byte offset into the
/// expression source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at offset {position}: {reason}")]
pub struct SyntaxError {
    pub position: usize,
    pub reason: String,
}

impl SyntaxError {
    pub fn new(position: usize, reason: impl Into<String>) -> Self {
        Self {
            position,
            reason: reason.into(),
        }
    }
}

/// A runtime failure. A failing sub-expression aborts the whole evaluation;
/// no partial results are surfaced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("unknown function {0}()")]
    UnknownFunction(String),

    #[error("{function}() expects {expected} argument(s), got {got}")]
    ArgumentCount {
        function: String,
        expected: String,
        got: usize,
    },

    #[error("unbound variable ${0}")]
    UnboundVariable(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("{0}() is only available inside a step or predicate context")]
    ContextlessFunction(&'static str),

    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl EvaluationError {
    pub(crate) fn type_mismatch(msg: impl Into<String>) -> Self {
        EvaluationError::TypeMismatch(msg.into())
    }
}
