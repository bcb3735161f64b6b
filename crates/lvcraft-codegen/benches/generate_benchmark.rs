//! Generation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lvcraft_codegen::{extract_guards, Generator, EmitOptions};
use lvcraft_core::{EventBinding, Layout, SharedStyle, Styles, WidgetNode};

/// A screen of `rows` rows, each a container with a label and a button.
fn screen(rows: usize) -> Layout {
    let mut root = WidgetNode::new("obj").with_id("screen").with_style("panel");
    for i in 0..rows {
        let row = WidgetNode::new("obj")
            .with_property("y", (i * 40) as i64)
            .with_child(WidgetNode::new("label").with_property("text", "Row"))
            .with_child(
                WidgetNode::new("button")
                    .with_id(format!("row{i}"))
                    .with_style("accent")
                    .with_event("onClick", EventBinding::Stub),
            );
        root = root.with_child(row);
    }
    Layout::new(Some(root))
}

fn styles() -> Styles {
    Styles::new(vec![
        SharedStyle::new("panel").with("bg_color", 0x202020_i64),
        SharedStyle::new("accent").with("bg_color", 0x4285f4_i64).with("radius", 6_i64),
    ])
}

fn generate_fresh(c: &mut Criterion) {
    let generator = Generator::new(EmitOptions::default()).unwrap();
    let layout = screen(50);
    let styles = styles();

    c.bench_function("generate_fresh", |b| {
        b.iter(|| generator.generate(black_box(&layout), black_box(&styles), None))
    });
}

fn regenerate(c: &mut Criterion) {
    let generator = Generator::new(EmitOptions::default()).unwrap();
    let layout = screen(50);
    let styles = styles();
    let previous = generator.generate(&layout, &styles, None).unwrap().source.content;

    c.bench_function("regenerate", |b| {
        b.iter(|| {
            generator.generate(
                black_box(&layout),
                black_box(&styles),
                Some(black_box(&previous)),
            )
        })
    });
}

fn extract(c: &mut Criterion) {
    let generator = Generator::new(EmitOptions::default()).unwrap();
    let previous = generator.generate(&screen(200), &styles(), None).unwrap().source.content;

    c.bench_function("extract_guards", |b| b.iter(|| extract_guards(black_box(&previous))));
}

criterion_group!(benches, generate_fresh, regenerate, extract);
criterion_main!(benches);
