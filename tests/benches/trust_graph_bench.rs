//! # GBan Benchmarks
//!
//! | Subsystem | Operation | Expectation |
//! |-----------|-----------|-------------|
//! | gb-01 Trust Graph | Index build from stored edges | O(n log n) sort + linear grouping |
//! | gb-01 Trust Graph | `who_trusts` lookup | O(1) + set copy |
//! | gb-02 Fan-Out | Dispatch to N targets | bounded by slowest handler |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gb_01_trust_graph::{build_indices, InMemoryTrustStore, TrustApi, TrustEdge, TrustGraph};
use gb_02_fan_out::FanOutExecutor;
use rand::Rng;
use shared_types::NodeId;
use std::sync::Arc;
use std::time::Duration;

fn random_edges(count: usize, nodes: u64) -> Vec<TrustEdge> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let source = rng.gen_range(0..nodes);
            let mut destination = rng.gen_range(0..nodes);
            if destination == source {
                destination = (destination + 1) % nodes;
            }
            TrustEdge::new(NodeId(source), NodeId(destination))
        })
        .collect()
}

// ============================================================================
// GB-01: Trust Graph
// ============================================================================

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("gb-01-index-build");
    group.measurement_time(Duration::from_secs(5));

    for size in [100usize, 1_000, 10_000] {
        let edges = random_edges(size, (size as u64 / 4).max(2));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("build_indices", size), &edges, |b, edges| {
            b.iter(|| black_box(build_indices(edges.clone())))
        });
    }

    group.finish();
}

fn bench_graph_load_and_query(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let mut group = c.benchmark_group("gb-01-trust-graph");

    for size in [1_000usize, 10_000] {
        let edges = random_edges(size, 500);
        let store = Arc::new(InMemoryTrustStore::with_edges(edges));

        group.bench_with_input(BenchmarkId::new("load", size), &store, |b, store| {
            b.iter(|| black_box(rt.block_on(TrustGraph::load(store.clone())).is_ok()))
        });

        let graph = rt.block_on(TrustGraph::load(store)).unwrap();
        let mut rng = rand::thread_rng();
        group.bench_function(BenchmarkId::new("who_trusts", size), |b| {
            b.iter(|| black_box(graph.who_trusts(NodeId(rng.gen_range(0..500))).len()))
        });
    }

    group.finish();
}

// ============================================================================
// GB-02: Fan-Out
// ============================================================================

fn bench_fan_out(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap();
    let mut group = c.benchmark_group("gb-02-fan-out");

    for targets in [10u64, 100, 1_000] {
        group.throughput(Throughput::Elements(targets));
        group.bench_with_input(BenchmarkId::new("dispatch", targets), &targets, |b, &n| {
            b.iter(|| {
                let results = rt.block_on(
                    FanOutExecutor::new((0..n).map(NodeId)).run(|node| async move { node.get() }),
                );
                black_box(results.len())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_index_build,
    bench_graph_load_and_query,
    bench_fan_out,
);

criterion_main!(benches);
