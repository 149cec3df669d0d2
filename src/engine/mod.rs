//! Evaluation machinery: the expression-tree interpreter, lazy axis
//! streams, the built-in function table, and document-order utilities.

pub mod axes;
pub mod evaluator;
pub mod functions;
pub mod order;
