//! Compiler Benchmarks
//!
//! Measures statement compilation across the following categories:
//!
//! - **Simple Statements**: single MATCH/RETURN with a filter
//! - **Mutations**: CREATE/MERGE with merged SET fragments
//! - **Stress**: long chains, wide projections, and deep subquery nesting
//! - **Lexing**: tokenizing compiled statement text
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench simple_statements
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use cypher_compiler::ast::builder::{count_star, lit, node, param, prop, var};
use cypher_compiler::ast::{Chain, NodeRef, RelRef};
use cypher_compiler::{Comprehension, Query, compile_comprehension, tokenize};

// ============================================================================
// Simple Statement Benchmarks
// ============================================================================

fn bench_simple_statements(c: &mut Criterion) {
    let mut group = c.benchmark_group("simple_statements");

    let queries = vec![
        (
            "match_return",
            Query::new().match_(node("n", "Person")).return_([var("n")]),
        ),
        (
            "filtered",
            Query::new()
                .match_(node("p", "Person"))
                .where_(prop("p", "age").gt(param("min_age", 30)))
                .return_([prop("p", "name").alias("name")]),
        ),
        (
            "aggregate_paged",
            Query::new()
                .match_(node("p", "Person"))
                .with([prop("p", "city").alias("city"), count_star().alias("total")])
                .where_(var("total").gt(lit(10)))
                .return_([var("city"), var("total")])
                .limit(param("limit", 25)),
        ),
    ];

    for (name, query) in queries {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(name), &query, |b, q| {
            b.iter(|| black_box(q).compile());
        });
    }

    let comprehension = Comprehension::new(prop("p", "name"), "p", "Person")
        .filter(prop("p", "age").gt(lit(25)));
    group.bench_function("comprehension", |b| {
        b.iter(|| compile_comprehension(black_box(&comprehension)));
    });

    group.finish();
}

// ============================================================================
// Mutation Benchmarks
// ============================================================================

fn bench_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutations");

    let mut create = Query::new().create(node("n", "Person"));
    for i in 0..16 {
        create = create.set(prop("n", format!("field{i}")), param(format!("v{i}"), i));
    }
    group.bench_function("create_with_merged_sets", |b| {
        b.iter(|| black_box(&create).compile());
    });

    let merge = Query::new()
        .merge(node("n", "Person").with_property("id", param("id", 7)))
        .set(prop("n", "seen"), lit(true))
        .return_([var("n")]);
    group.bench_function("merge", |b| {
        b.iter(|| black_box(&merge).compile());
    });

    group.finish();
}

// ============================================================================
// Stress Benchmarks
// ============================================================================

fn long_chain(hops: usize) -> Query {
    let mut chain = Chain::new(NodeRef::new("n0", "Node"));
    for i in 1..=hops {
        chain = chain.forward(RelRef::typed("NEXT"), NodeRef::named(format!("n{i}")));
    }
    Query::new().match_(chain).return_([var("n0")])
}

fn wide_projection(width: usize) -> Query {
    let items: Vec<_> = (0..width).map(|i| prop("n", format!("p{i}"))).collect();
    Query::new().match_(node("n", "Wide")).return_(items)
}

fn nested_calls(depth: usize) -> Query {
    let mut query = Query::new().match_(node("n", "Leaf")).return_([var("n")]);
    for _ in 0..depth {
        query = Query::new().call(query).return_([var("n")]);
    }
    query
}

fn bench_stress(c: &mut Criterion) {
    let mut group = c.benchmark_group("stress");

    for size in [10, 100, 500] {
        let chain = long_chain(size);
        group.bench_with_input(BenchmarkId::new("long_chain", size), &chain, |b, q| {
            b.iter(|| black_box(q).compile());
        });

        let wide = wide_projection(size);
        group.bench_with_input(BenchmarkId::new("wide_projection", size), &wide, |b, q| {
            b.iter(|| black_box(q).compile());
        });
    }

    for depth in [4, 16, 30] {
        let nested = nested_calls(depth);
        group.bench_with_input(BenchmarkId::new("nested_calls", depth), &nested, |b, q| {
            b.iter(|| black_box(q).compile());
        });
    }

    group.finish();
}

// ============================================================================
// Lexing Benchmarks
// ============================================================================

fn bench_lexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexing");

    for size in [10, 100] {
        let Ok(compiled) = long_chain(size).compile() else {
            continue;
        };
        group.throughput(Throughput::Bytes(compiled.text.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("chain_text", size),
            &compiled.text,
            |b, text| {
                b.iter(|| tokenize(black_box(text)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_simple_statements,
    bench_mutations,
    bench_stress,
    bench_lexing
);
criterion_main!(benches);
