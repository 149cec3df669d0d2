//! Property suites for the universal invariants: no panics anywhere,
//! idempotent normalization, total substring, deduplicated document-order
//! results, and the `//x` / `descendant-or-self::x` round trip.

use navpath::{
    attr, compile, doc, elem, text, Bindings, Navigator, SimpleNode, SimpleNodeBuilder, Value,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Spec {
    Text(&'static str),
    Elem(&'static str, Vec<(&'static str, &'static str)>, Vec<Spec>),
}

fn arb_spec() -> impl Strategy<Value = Spec> {
    let tag = prop::sample::select(vec!["a", "b", "div", "span", "p"]);
    let leaf = prop_oneof![
        prop::sample::select(vec!["", "foo", "bar"]).prop_map(Spec::Text),
        tag.clone().prop_map(|t| Spec::Elem(t, Vec::new(), Vec::new())),
    ];
    leaf.prop_recursive(4, 24, 4, move |inner| {
        (
            prop::sample::select(vec!["a", "b", "div", "span", "p"]),
            prop::collection::vec(
                (
                    prop::sample::select(vec!["id", "class", "href"]),
                    prop::sample::select(vec!["", "x", "y"]),
                ),
                0..3,
            ),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(t, attrs, children)| Spec::Elem(t, attrs, children))
    })
}

fn realize(spec: &Spec) -> Option<SimpleNodeBuilder> {
    match spec {
        Spec::Text(_) => None,
        Spec::Elem(tag, attrs, children) => {
            let mut builder = elem(tag);
            for (name, value) in attrs {
                builder = builder.attr(attr(name, value));
            }
            for child in children {
                builder = match child {
                    Spec::Text(value) => builder.child(text(value)),
                    nested @ Spec::Elem(..) => builder.child(realize(nested).unwrap()),
                };
            }
            Some(builder)
        }
    }
}

fn arb_tree() -> impl Strategy<Value = SimpleNode> {
    prop::collection::vec(arb_spec(), 0..4).prop_map(|specs| {
        let mut builder = elem("doc");
        for spec in &specs {
            builder = match spec {
                Spec::Text(value) => builder.child(text(value)),
                nested @ Spec::Elem(..) => builder.child(realize(nested).unwrap()),
            };
        }
        doc().child(builder).build()
    })
}

/// Pre-order enumeration of the whole document through navigator moves
/// only; elements are followed by their attributes, then their children.
fn dfs_order(root: &SimpleNode) -> Vec<SimpleNode> {
    fn rec(node: &SimpleNode, out: &mut Vec<SimpleNode>) {
        out.push(node.clone());
        let mut a = node.clone();
        if a.move_to_first_attribute() {
            loop {
                out.push(a.clone());
                if !a.move_to_next_attribute() {
                    break;
                }
            }
        }
        let mut c = node.clone();
        if c.move_to_first_child() {
            loop {
                rec(&c, out);
                if !c.move_to_next_sibling() {
                    break;
                }
            }
        }
    }
    let mut out = Vec::new();
    let mut r = root.clone();
    r.move_to_root();
    rec(&r, &mut out);
    out
}

fn rank_of(order: &[SimpleNode], node: &SimpleNode) -> usize {
    order
        .iter()
        .position(|n| n.is_same_position(node))
        .expect("result node not reachable from the root")
}

proptest! {
    /// Compilation terminates with a value or a `SyntaxError`, never a
    /// panic, on completely arbitrary input.
    #[test]
    fn compile_never_panics(input in ".*") {
        let _ = compile(&input);
    }

    /// The same, biased toward strings that look like XPath.
    #[test]
    fn compile_never_panics_on_xpath_shaped_input(
        input in "[a-z@/\\[\\]()*.'\",:$|+=<> 0-9-]{0,40}"
    ) {
        let _ = compile(&input);
    }

    /// Whatever compiles also evaluates without panicking, producing one of
    /// the four value kinds or an error.
    #[test]
    fn evaluation_never_panics(
        input in "[a-z@/\\[\\]()*.'\",:$|+=<> 0-9-]{0,40}",
        root in arb_tree()
    ) {
        if let Ok(expr) = compile(&input) {
            let _ = expr.evaluate(&root);
        }
    }

    #[test]
    fn normalize_space_is_idempotent(s in ".*") {
        let root = doc().child(elem("r")).build();
        let bindings = Bindings::new().bind("s", Value::String(s));
        let once = compile("normalize-space($s)")
            .unwrap()
            .evaluate_with(&root, &bindings)
            .unwrap()
            .string_value();
        let twice = compile("normalize-space(normalize-space($s))")
            .unwrap()
            .evaluate_with(&root, &bindings)
            .unwrap()
            .string_value();
        prop_assert_eq!(once, twice);
    }

    /// `substring` returns a string for every finite start/length, with no
    /// index panics on any input string.
    #[test]
    fn substring_is_total(
        s in ".*",
        start in -1.0e12f64..1.0e12,
        len in -1.0e12f64..1.0e12
    ) {
        let root = doc().child(elem("r")).build();
        let bindings = Bindings::new()
            .bind("s", Value::String(s))
            .bind("a", Value::Number(start))
            .bind("b", Value::Number(len));
        let out = compile("substring($s, $a, $b)")
            .unwrap()
            .evaluate_with(&root, &bindings)
            .unwrap();
        prop_assert!(matches!(out, Value::String(_)));
    }

    /// Path results carry no duplicate positions and come out in document
    /// order.
    #[test]
    fn path_results_are_distinct_and_ordered(root in arb_tree()) {
        let order = dfs_order(&root);
        for expr in ["//*", "//* | //a/ancestor-or-self::*", "//@*", "//node()/.."] {
            let hits: Vec<SimpleNode> =
                compile(expr).unwrap().select(&root).unwrap().collect();
            let ranks: Vec<usize> = hits.iter().map(|n| rank_of(&order, n)).collect();
            for pair in ranks.windows(2) {
                prop_assert!(
                    pair[0] < pair[1],
                    "{} results out of order or duplicated: {:?}",
                    expr,
                    ranks
                );
            }
        }
    }

    /// Every node `//a` reaches is also reached by walking
    /// `descendant-or-self::a` from the root, and vice versa.
    #[test]
    fn double_slash_round_trips_with_descendant_or_self(root in arb_tree()) {
        let via_abbrev: Vec<SimpleNode> =
            compile("//a").unwrap().select(&root).unwrap().collect();
        let via_axis: Vec<SimpleNode> = compile("descendant-or-self::a")
            .unwrap()
            .select(&root)
            .unwrap()
            .collect();
        prop_assert_eq!(via_abbrev.len(), via_axis.len());
        for (x, y) in via_abbrev.iter().zip(via_axis.iter()) {
            prop_assert!(x.is_same_position(y));
        }
    }

    /// `following`, `preceding`, `ancestor-or-self`, and
    /// `descendant-or-self` partition the element document around any
    /// context node.
    #[test]
    fn axes_partition_the_document(root in arb_tree()) {
        let total = compile("//*").unwrap().select(&root).unwrap().count();
        let anchor = compile("//*[last()]")
            .unwrap()
            .select(&root)
            .unwrap()
            .next();
        if let Some(anchor) = anchor {
            let mut seen: Vec<SimpleNode> = Vec::new();
            for axis in [
                "ancestor-or-self::*",
                "descendant::*",
                "preceding::*",
                "following::*",
            ] {
                for node in compile(axis).unwrap().select(&anchor).unwrap() {
                    prop_assert!(
                        !seen.iter().any(|s| s.is_same_position(&node)),
                        "{} overlaps another region",
                        axis
                    );
                    seen.push(node);
                }
            }
            prop_assert_eq!(seen.len(), total);
        }
    }
}
