//! Performance benchmarks for counting polynomial assembly.
//!
//! Run with: `cargo bench --bench assembly`
//!
//! ## What Is Measured
//!
//! | Benchmark | Notes |
//! |-----------|-------|
//! | `assembly/*` | Full N(T), warm `R_k` cache |
//! | `cold_assembly` | Fresh assembler per iteration |
//! | `todd/generic` | Generic `R_k` construction |
//! | `subgraphs/*` | Enumeration alone |
//! | `simulation` | Wavefront oracle at T = 20 |

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pc_polynomial::io::graph_file::POSITIONAL_PREFIX;
use pc_polynomial::{
    connected_subgraphs, AssemblyPolicy, Family, PolynomialAssembler, Symbol, ToddPolynomial, VertexId,
    WavefrontSimulator,
};

const FAMILIES: [Family; 5] = [
    Family::Triangle,
    Family::Bamboo(4),
    Family::Multiedge(4),
    Family::TriangleWithTail,
    Family::HGraph,
];

/// Benchmark assembly with a shared assembler.
fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");

    for mode in [AssemblyPolicy::inward(), AssemblyPolicy::outward()] {
        let label = mode.mode.to_string();
        let assembler = PolynomialAssembler::new(mode);
        for family in FAMILIES {
            let (_, edges, graph) = family.build();
            group.throughput(Throughput::Elements(edges as u64));
            group.bench_with_input(
                BenchmarkId::new(label.as_str(), family),
                &graph,
                |b, graph| b.iter(|| assembler.build(black_box(graph)).unwrap()),
            );
        }
    }

    group.finish();
}

/// Benchmark assembly including `R_k` construction.
fn bench_cold_assembly(c: &mut Criterion) {
    let (_, _, graph) = Family::TriangleWithTail.build();
    c.bench_function("cold_assembly", |b| {
        b.iter(|| PolynomialAssembler::default().build(black_box(&graph)).unwrap())
    });
}

/// Benchmark generic Todd polynomial construction.
fn bench_todd(c: &mut Criterion) {
    let mut group = c.benchmark_group("todd");
    for order in [2, 4, 6] {
        group.bench_with_input(BenchmarkId::new("generic", order), &order, |b, &order| {
            b.iter(|| ToddPolynomial::generic(black_box(order)).unwrap())
        });
    }
    group.finish();
}

/// Benchmark subgraph enumeration.
fn bench_subgraphs(c: &mut Criterion) {
    let mut group = c.benchmark_group("subgraphs");
    for len in [4, 6, 8] {
        let (_, _, graph) = Family::Bamboo(len).build();
        group.bench_with_input(BenchmarkId::new("bamboo", len), &graph, |b, graph| {
            b.iter(|| connected_subgraphs(black_box(graph), VertexId::new(0)).unwrap())
        });
    }
    group.finish();
}

/// Benchmark the wavefront simulator.
fn bench_simulation(c: &mut Criterion) {
    let (_, edges, graph) = Family::TriangleWithTail.build();
    let lengths: BTreeMap<Symbol, f64> = [1.0_f64, 2.0, 3.0, 5.0, 7.0]
        .iter()
        .take(edges)
        .enumerate()
        .map(|(i, x)| (Symbol::indexed(POSITIONAL_PREFIX, i), x.sqrt()))
        .collect();
    let simulator = WavefrontSimulator::new();

    c.bench_function("simulation", |b| {
        b.iter(|| {
            simulator
                .count_at(black_box(&graph), VertexId::new(0), &lengths, 20.0)
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_assembly,
    bench_cold_assembly,
    bench_todd,
    bench_subgraphs,
    bench_simulation,
);
criterion_main!(benches);
