//! `navpath` — an XPath 1.0 query engine (plus the string and regex
//! extension functions of XPath 2.0) evaluated over an abstract cursor-style
//! [`Navigator`], so any hierarchical document model can be queried without
//! committing to a concrete tree type.
//!
//! Compilation is pure: [`compile`] turns an expression string into an
//! immutable [`Expression`] that is `Send + Sync` and may be evaluated
//! concurrently, each evaluation over its own navigator. Evaluation yields
//! one of the four XPath value kinds — boolean, number, string, node-set —
//! or an [`EvaluationError`]; malformed expressions fail at [`compile`] with
//! a [`SyntaxError`]. Namespace prefixes are matched literally, never
//! resolved.
//!
//! ```
//! use navpath::{attr, compile, doc, elem};
//!
//! let root = doc()
//!     .child(
//!         elem("bookstore")
//!             .child(elem("book").attr(attr("category", "cooking")))
//!             .child(elem("book").attr(attr("category", "web"))),
//!     )
//!     .build();
//!
//! let expr = compile("//book[@category = 'cooking']").unwrap();
//! let hits: Vec<_> = expr.select(&root).unwrap().collect();
//! assert_eq!(hits.len(), 1);
//! ```

pub mod engine;
pub mod error;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod simple_node;
pub mod value;

pub use engine::evaluator::Bindings;
pub use error::{EvaluationError, SyntaxError};
pub use model::{Navigator, NodeKind, QName};
pub use simple_node::{SimpleNode, SimpleNodeBuilder, attr, comment, doc, elem, ns, pi, text};
pub use value::{NodeSet, Value};

use engine::evaluator::{eval, EvalContext};
use parser::ast::Expr;

/// Compiles an XPath expression into a reusable [`Expression`].
pub fn compile(expr: &str) -> Result<Expression, SyntaxError> {
    parser::parse(expr).map(|root| Expression { root })
}

/// A compiled expression: immutable, shareable across threads, reusable
/// against any number of navigators.
#[derive(Debug, Clone)]
pub struct Expression {
    root: Expr,
}

impl Expression {
    /// Evaluates against the document `nav` points into, with no variable
    /// bindings.
    pub fn evaluate<N: Navigator>(&self, nav: &N) -> Result<Value<N>, EvaluationError> {
        self.evaluate_with(nav, &Bindings::new())
    }

    /// Evaluates with explicit variable bindings. The navigator is cloned;
    /// the caller's position is untouched.
    pub fn evaluate_with<N: Navigator>(
        &self,
        nav: &N,
        bindings: &Bindings<N>,
    ) -> Result<Value<N>, EvaluationError> {
        let ctx = EvalContext::new(nav.clone(), bindings);
        eval(&self.root, &ctx)
    }

    /// Evaluates a path expression and iterates the resulting nodes in the
    /// set's order (document order for paths). Errors with `TypeMismatch`
    /// when the result is not a node-set.
    pub fn select<N: Navigator>(&self, nav: &N) -> Result<Select<N>, EvaluationError> {
        match self.evaluate(nav)? {
            Value::Nodes(ns) => Ok(Select {
                inner: ns.into_vec().into_iter(),
            }),
            other => Err(EvaluationError::TypeMismatch(format!(
                "select() needs a node-set result, got a {}",
                other.kind_name()
            ))),
        }
    }
}

/// Iterator over the navigators selected by a path expression.
pub struct Select<N> {
    inner: std::vec::IntoIter<N>,
}

impl<N> Iterator for Select<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        self.inner.next()
    }
}

impl<N> ExactSizeIterator for Select<N> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}
