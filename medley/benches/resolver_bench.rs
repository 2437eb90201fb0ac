//! Benchmarks for execution order resolution.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use medley::prelude::*;
use std::sync::Arc;

/// Builds a registry of `n` stages forming a chain with fan-out: each
/// stage requires its predecessor, phases alternate.
fn chain_registry(n: usize) -> StageRegistry {
    let mut registry = StageRegistry::new();
    for i in 0..n {
        let mut descriptor = StageDescriptor::new(
            format!("stage_{i:04}"),
            InputCategory::audio(),
            Arc::new(NoOpStage),
        )
        .with_phase(i32::try_from(i % 4).unwrap_or(0));
        if i > 0 {
            descriptor = descriptor.with_required(format!("stage_{:04}", i - 1));
        }
        registry.register(descriptor).unwrap();
    }
    registry
}

fn resolver_benchmark(c: &mut Criterion) {
    let registry = chain_registry(200);
    c.bench_function("resolve_200_stage_chain", |b| {
        b.iter(|| black_box(resolve_execution_order(&registry).unwrap()))
    });

    let small = chain_registry(10);
    c.bench_function("resolve_10_stage_chain", |b| {
        b.iter(|| black_box(resolve_execution_order(&small).unwrap()))
    });
}

criterion_group!(benches, resolver_benchmark);
criterion_main!(benches);
