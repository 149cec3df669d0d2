//! Number functions and the number conversion rules.

mod common;

use common::*;
use navpath::{doc, elem, text};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn number_parses_trimmed_decimal_strings() {
    let root = book_example();
    assert_eq!(eval_number(&root, "number('  12.5 ')"), 12.5);
    assert_eq!(eval_number(&root, "number('-3')"), -3.0);
    assert!(eval_number(&root, "number('1e3')").is_nan());
    assert!(eval_number(&root, "number('12px')").is_nan());
    assert!(eval_number(&root, "number('')").is_nan());
    assert_eq!(eval_number(&root, "number(true())"), 1.0);
    assert_eq!(eval_number(&root, "number(false())"), 0.0);
    assert_eq!(eval_number(&root, "number(//book[1]/price)"), 30.0);
    assert!(eval_number(&root, "number(//missing)").is_nan());
}

#[rstest]
fn number_without_arguments_reads_the_context_node() {
    let root = doc().child(elem("n").child(text("41"))).build();
    assert_eq!(eval_number(&root, "number()"), 41.0);
    assert_eq!(select_count(&root, "//n[number() = 41]"), 1);
}

#[rstest]
fn sum_adds_node_string_values() {
    let root = book_example();
    assert_eq!(eval_number(&root, "sum(//price)"), 30.00 + 29.99 + 49.99 + 39.95);
    assert_eq!(eval_number(&root, "sum(//missing)"), 0.0);
    // A non-numeric member poisons the sum.
    assert!(eval_number(&root, "sum(//title)").is_nan());
}

#[rstest]
fn sum_requires_a_node_set() {
    let root = book_example();
    let err = navpath::compile("sum(3)").unwrap().evaluate(&root);
    assert!(matches!(
        err,
        Err(navpath::EvaluationError::TypeMismatch(_))
    ));
}

#[rstest]
#[case("floor(2.6)", 2.0)]
#[case("floor(-2.6)", -3.0)]
#[case("ceiling(2.1)", 3.0)]
#[case("ceiling(-2.1)", -2.0)]
#[case("round(2.5)", 3.0)]
#[case("round(2.4)", 2.0)]
// Halves round toward positive infinity, even below zero.
#[case("round(-2.5)", -2.0)]
#[case("round(-2.6)", -3.0)]
fn rounding_family(#[case] expr: &str, #[case] expected: f64) {
    let root = book_example();
    assert_eq!(eval_number(&root, expr), expected);
}

#[rstest]
fn rounding_preserves_non_finite_values() {
    let root = book_example();
    assert!(eval_number(&root, "round(0 div 0)").is_nan());
    assert_eq!(eval_number(&root, "round(1 div 0)"), f64::INFINITY);
    assert_eq!(eval_number(&root, "floor(1 div 0)"), f64::INFINITY);
}

#[rstest]
fn count_counts_distinct_nodes() {
    let root = book_example();
    assert_eq!(eval_number(&root, "count(//book)"), 4.0);
    assert_eq!(eval_number(&root, "count(//missing)"), 0.0);
    // The union operand overlap does not double-count.
    assert_eq!(eval_number(&root, "count(//book | //book[@cover])"), 4.0);
    assert_eq!(eval_number(&root, "count(//@*)"), 9.0);
}
