//! Shared fixtures and helpers for the integration suites.

#![allow(dead_code)]

use navpath::{attr, compile, doc, elem, text, Bindings, Navigator, SimpleNode, Value};

/// The W3C bookstore sample: four books with categories `cooking`,
/// `children`, `web`, `web`.
pub fn book_example() -> SimpleNode {
    doc()
        .child(
            elem("bookstore")
                .child(
                    elem("book")
                        .attr(attr("category", "cooking"))
                        .child(
                            elem("title")
                                .attr(attr("lang", "en"))
                                .child(text("Everyday Italian")),
                        )
                        .child(elem("author").child(text("Giada De Laurentiis")))
                        .child(elem("year").child(text("2005")))
                        .child(elem("price").child(text("30.00"))),
                )
                .child(
                    elem("book")
                        .attr(attr("category", "children"))
                        .child(
                            elem("title")
                                .attr(attr("lang", "en"))
                                .child(text("Harry Potter")),
                        )
                        .child(elem("author").child(text("J K. Rowling")))
                        .child(elem("year").child(text("2005")))
                        .child(elem("price").child(text("29.99"))),
                )
                .child(
                    elem("book")
                        .attr(attr("category", "web"))
                        .child(
                            elem("title")
                                .attr(attr("lang", "en"))
                                .child(text("XQuery Kick Start")),
                        )
                        .child(elem("author").child(text("James McGovern")))
                        .child(elem("author").child(text("Per Bothner")))
                        .child(elem("year").child(text("2003")))
                        .child(elem("price").child(text("49.99"))),
                )
                .child(
                    elem("book")
                        .attr(attr("category", "web"))
                        .attr(attr("cover", "paperback"))
                        .child(
                            elem("title")
                                .attr(attr("lang", "en"))
                                .child(text("Learning XML")),
                        )
                        .child(elem("author").child(text("Erik T. Ray")))
                        .child(elem("year").child(text("2003")))
                        .child(elem("price").child(text("39.95"))),
                ),
        )
        .build()
}

/// Selects and returns the written names of the resulting nodes, in result
/// order.
pub fn select_names(root: &SimpleNode, expr: &str) -> Vec<String> {
    compile(expr)
        .unwrap()
        .select(root)
        .unwrap()
        .map(|n| {
            let prefix = n.prefix();
            let local = n.local_name();
            if prefix.is_empty() {
                local
            } else {
                format!("{prefix}:{local}")
            }
        })
        .collect()
}

/// Selects and returns the string-values of the resulting nodes.
pub fn select_values(root: &SimpleNode, expr: &str) -> Vec<String> {
    compile(expr)
        .unwrap()
        .select(root)
        .unwrap()
        .map(|n| n.string_value())
        .collect()
}

pub fn select_count(root: &SimpleNode, expr: &str) -> usize {
    compile(expr).unwrap().select(root).unwrap().count()
}

pub fn eval_value(root: &SimpleNode, expr: &str) -> Value<SimpleNode> {
    compile(expr).unwrap().evaluate(root).unwrap()
}

pub fn eval_string(root: &SimpleNode, expr: &str) -> String {
    eval_value(root, expr).string_value()
}

pub fn eval_number(root: &SimpleNode, expr: &str) -> f64 {
    match eval_value(root, expr) {
        Value::Number(n) => n,
        other => panic!("expected a number, got {other:?}"),
    }
}

pub fn eval_boolean(root: &SimpleNode, expr: &str) -> bool {
    match eval_value(root, expr) {
        Value::Boolean(b) => b,
        other => panic!("expected a boolean, got {other:?}"),
    }
}

pub fn eval_with(
    root: &SimpleNode,
    expr: &str,
    bindings: &Bindings<SimpleNode>,
) -> Value<SimpleNode> {
    compile(expr).unwrap().evaluate_with(root, bindings).unwrap()
}
