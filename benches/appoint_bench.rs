//! Criterion benchmarks for model building, the greedy start and the
//! end-to-end optimizer.
//!
//! Instances come from the seeded synthetic generator so runs are
//! reproducible.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_appoint::config::OptimizerConfig;
use u_appoint::mip::{Materialization, ModelBuilder};
use u_appoint::models::Instance;
use u_appoint::scheduler::{GreedyScheduler, Optimizer};
use u_appoint::synthetic::{InstanceGenerator, InstanceGeneratorConfig};

fn instances() -> Vec<(&'static str, Instance)> {
    vec![
        ("easy", InstanceGenerator::new(InstanceGeneratorConfig::easy(), 1).generate()),
        ("medium", InstanceGenerator::new(InstanceGeneratorConfig::medium(), 1).generate()),
        ("hard", InstanceGenerator::new(InstanceGeneratorConfig::hard(), 1).generate()),
    ]
}

// ===========================================================================
// Model building
// ===========================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_build");
    group.sample_size(10);

    for (name, inst) in instances() {
        group.bench_with_input(BenchmarkId::new("sparse", name), &inst, |b, inst| {
            b.iter(|| ModelBuilder::new(black_box(inst)).build())
        });
    }

    // the dense cross product only for the small instance
    let easy = InstanceGenerator::new(InstanceGeneratorConfig::easy(), 1).generate();
    group.bench_with_input(BenchmarkId::new("dense", "easy"), &easy, |b, inst| {
        b.iter(|| {
            ModelBuilder::new(black_box(inst))
                .with_materialization(Materialization::Dense)
                .build()
        })
    });

    group.finish();
}

// ===========================================================================
// Greedy start
// ===========================================================================

fn bench_greedy(c: &mut Criterion) {
    let mut group = c.benchmark_group("greedy");

    for (name, inst) in instances() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &inst, |b, inst| {
            b.iter(|| GreedyScheduler::new().schedule(black_box(inst)))
        });
    }

    group.finish();
}

// ===========================================================================
// End to end
// ===========================================================================

fn bench_optimizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimizer");
    group.sample_size(10);

    let optimizer = Optimizer::new(OptimizerConfig::default());
    for (name, inst) in instances().into_iter().take(2) {
        group.bench_with_input(BenchmarkId::from_parameter(name), &inst, |b, inst| {
            b.iter(|| optimizer.run(black_box(inst)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_greedy, bench_optimizer);
criterion_main!(benches);
