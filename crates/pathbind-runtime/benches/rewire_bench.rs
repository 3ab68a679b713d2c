//! Benchmarks for binding construction, reads, and head rewires.
//!
//! Run with: `cargo bench --package pathbind-runtime --bench rewire_bench`
//!
//! | Benchmark | What it measures |
//! |-----------|------------------|
//! | `create/depth/N` | Factory building an N-segment chain |
//! | `get_value/depth/N` | One read through an N-segment chain |
//! | `rewire/head_swap` | Replacing the head object (dispose + rebuild + fire) |
//! | `leaf_change/depth/N` | A leaf change propagating through N levels |

use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pathbind_core::{BindingConfig, PropertyBag, PropertyToken, Value};
use pathbind_runtime::{PathSourceBindingFactory, SourceBinding, SourceBindingFactory};
use std::hint::black_box;

const DEPTHS: [usize; 3] = [2, 4, 8];

/// `Root.P.P...P.Leaf` with `depth` segments in total. Returns the root, the
/// innermost object, and the path.
fn nested(depth: usize) -> (Rc<PropertyBag>, Rc<PropertyBag>, Vec<PropertyToken>) {
    let leaf = Rc::new(PropertyBag::new("Node").with("Leaf", 0));
    let mut current = Rc::clone(&leaf);
    for _ in 1..depth {
        current = Rc::new(PropertyBag::new("Node").with("P", current));
    }
    let mut path: Vec<PropertyToken> = (1..depth).map(|_| PropertyToken::name("P")).collect();
    path.push(PropertyToken::name("Leaf"));
    (current, leaf, path)
}

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");
    let factory = PathSourceBindingFactory::new(BindingConfig::new());
    for depth in DEPTHS {
        let (root, _leaf, path) = nested(depth);
        let source = Value::from(root);
        group.bench_with_input(BenchmarkId::new("depth", depth), &path, |b, path| {
            b.iter(|| black_box(factory.create_binding(&source, path)));
        });
    }
    group.finish();
}

fn bench_get_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_value");
    let factory = PathSourceBindingFactory::new(BindingConfig::new());
    for depth in DEPTHS {
        let (root, _leaf, path) = nested(depth);
        let binding = factory.create_binding(&Value::from(Rc::clone(&root)), &path);
        group.bench_function(BenchmarkId::new("depth", depth), |b| {
            b.iter(|| black_box(binding.get_value()));
        });
    }
    group.finish();
}

fn bench_rewire(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewire");
    let factory = PathSourceBindingFactory::new(BindingConfig::new());
    let root = Rc::new(PropertyBag::new("Root").with("B", Value::Null));
    let binding = factory.create_binding(
        &Value::from(Rc::clone(&root)),
        &[PropertyToken::name("B"), PropertyToken::name("C")],
    );
    let _sub = binding.changed().subscribe(|_| {});
    let heads: Vec<Rc<PropertyBag>> = (0..2)
        .map(|i| Rc::new(PropertyBag::new("Inner").with("C", i)))
        .collect();

    let mut flip = 0usize;
    group.bench_function("head_swap", |b| {
        b.iter(|| {
            flip ^= 1;
            let _ = root.set("B", Rc::clone(&heads[flip]));
        });
    });
    group.finish();
}

fn bench_leaf_change(c: &mut Criterion) {
    let mut group = c.benchmark_group("leaf_change");
    let factory = PathSourceBindingFactory::new(BindingConfig::new());
    for depth in DEPTHS {
        let (root, leaf, path) = nested(depth);
        let binding = factory.create_binding(&Value::from(Rc::clone(&root)), &path);
        let _sub = binding.changed().subscribe(|_| {});
        let mut n = 0i64;
        group.bench_function(BenchmarkId::new("depth", depth), |b| {
            b.iter(|| {
                n += 1;
                let _ = leaf.set("Leaf", n);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_create, bench_get_value, bench_rewire, bench_leaf_change);
criterion_main!(benches);
