use criterion::{black_box, criterion_group, criterion_main, Criterion};
use navpath::{attr, compile, doc, elem, text, SimpleNode, SimpleNodeBuilder};

/// A wide-and-deep synthetic document: `depth` nested sections, each with
/// `fanout` rows of spans.
fn sample_tree(depth: usize, fanout: usize) -> SimpleNode {
    fn section(depth: usize, fanout: usize) -> SimpleNodeBuilder {
        let mut builder = elem("section").attr(attr("depth", &depth.to_string()));
        for i in 0..fanout {
            let class = if i % 5 == 0 { "hit" } else { "row" };
            builder = builder.child(
                elem("div")
                    .attr(attr("class", class))
                    .child(elem("span").child(text("alpha")))
                    .child(elem("span").child(text("beta"))),
            );
        }
        if depth > 0 {
            builder = builder.child(section(depth - 1, fanout));
        }
        builder
    }
    doc().child(section(depth, fanout)).build()
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile/step_with_predicates", |b| {
        b.iter(|| compile(black_box("//div[@class = 'row']/span[2]/text()")).unwrap())
    });
    c.bench_function("compile/operators", |b| {
        b.iter(|| {
            compile(black_box(
                "count(//a) * 2 + 1 > 3 and contains(concat('x', 'y'), 'xy')",
            ))
            .unwrap()
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let root = sample_tree(8, 8);

    let scan = compile("//div[@class = 'hit']").unwrap();
    c.bench_function("evaluate/descendant_scan", |b| {
        b.iter(|| scan.select(black_box(&root)).unwrap().count())
    });

    // The constant positional predicate stops each axis pull at one hit.
    let first = compile("//section/div[1]").unwrap();
    c.bench_function("evaluate/positional_short_circuit", |b| {
        b.iter(|| first.select(black_box(&root)).unwrap().count())
    });

    let strings = compile("normalize-space(string(//section))").unwrap();
    c.bench_function("evaluate/string_value", |b| {
        b.iter(|| strings.evaluate(black_box(&root)).unwrap())
    });
}

criterion_group!(benches, bench_compile, bench_evaluate);
criterion_main!(benches);
