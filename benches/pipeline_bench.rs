use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use intent_solver::engine::pipeline::profit_bps;
use intent_solver::engine::processing_set::ProcessingSet;

fn bench_profit_bps(c: &mut Criterion) {
    c.bench_function("profit_bps", |b| {
        b.iter(|| profit_bps(black_box(1_500_000), black_box(1_000_000_000)))
    });
}

fn bench_claim_release(c: &mut Criterion) {
    let set = ProcessingSet::new();
    c.bench_function("processing_set_claim_release", |b| {
        b.iter(|| {
            let guard = set.try_claim(black_box("intent-bench"));
            drop(guard);
        })
    });
}

criterion_group!(benches, bench_profit_bps, bench_claim_release);
criterion_main!(benches);
