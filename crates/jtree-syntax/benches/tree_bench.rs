// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Benchmarks for parsing and declaration visibility.
//!
//! Run with:
//! ```bash
//! cargo bench -p jtree-syntax
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jtree_syntax::{
    parse_compilation_unit, resolve_visibility, NodeId, ResolveContext, SyntaxKind, SyntaxTree,
};
use std::fs;
use std::hint::black_box;
use std::path::PathBuf;

// =============================================================================
// Test Data Generation
// =============================================================================

/// A class with `num_methods` methods, each with a few locals, a loop and a
/// pattern match.
fn generate_class(num_methods: usize) -> String {
    let mut code = String::from("class Generated {\n    private int total;\n\n");
    for i in 0..num_methods {
        code.push_str(&format!(
            r#"    int method{i}(Object input, int[] values) {{
        int sum = {i};
        for (int j = 0; j < values.length; j++) {{
            sum += values[j] * 2;
        }}
        if (!(input instanceof String text)) {{
            return sum;
        }}
        total += text.length() + sum;
        return total;
    }}

"#
        ));
    }
    code.push_str("}\n");
    code
}

fn load_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}

/// Every `ExpressionStatement` in the tree, used as query places.
fn query_places(tree: &SyntaxTree) -> Vec<NodeId> {
    tree.descendants(tree.root())
        .filter(|n| tree.kind(*n) == SyntaxKind::ExpressionStatement)
        .collect()
}

// =============================================================================
// Parsing Benchmarks
// =============================================================================

fn bench_parse_generated(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_generated");
    for size in [10, 50, 200] {
        let code = generate_class(size);
        group.throughput(Throughput::Bytes(code.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_methods", size)),
            &code,
            |b, code| {
                b.iter(|| black_box(parse_compilation_unit(code).unwrap()));
            },
        );
    }
    group.finish();
}

fn bench_parse_fixtures(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_fixtures");
    for name in ["Shapes.java", "Control.java", "Lambdas.java"] {
        let code = load_fixture(name);
        group.throughput(Throughput::Bytes(code.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &code, |b, code| {
            b.iter(|| black_box(parse_compilation_unit(code).unwrap()));
        });
    }
    group.finish();
}

// =============================================================================
// Resolution Benchmarks
// =============================================================================

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_visibility");
    for size in [10, 50] {
        let tree = parse_compilation_unit(&generate_class(size)).unwrap();
        let places = query_places(&tree);

        group.bench_with_input(
            BenchmarkId::new("cold", format!("{}_methods", size)),
            &places,
            |b, places| {
                b.iter(|| {
                    for place in places {
                        let mut ctx = ResolveContext::new();
                        black_box(resolve_visibility(&tree, &mut ctx, *place, None, None));
                    }
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("shared_context", format!("{}_methods", size)),
            &places,
            |b, places| {
                let mut ctx = ResolveContext::new();
                b.iter(|| {
                    for place in places {
                        black_box(resolve_visibility(&tree, &mut ctx, *place, None, None));
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(parsing, bench_parse_generated, bench_parse_fixtures);
criterion_group!(resolution, bench_resolve);
criterion_main!(parsing, resolution);
