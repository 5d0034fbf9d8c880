use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use intent_solver::clob::level2::Level2Snapshot;
use intent_solver::clob::quote::{simulate_market_buy, simulate_market_sell};

fn deep_book() -> Level2Snapshot {
    use intent_solver::clob::level2::Level;

    let bids = (0..50)
        .map(|i| Level {
            price: 1.80 - i as f64 * 0.001,
            quantity: 1_000.0,
        })
        .collect();
    let asks = (0..50)
        .map(|i| Level {
            price: 1.82 + i as f64 * 0.001,
            quantity: 1_000.0,
        })
        .collect();
    Level2Snapshot { bids, asks }
}

fn bench_market_sell(c: &mut Criterion) {
    let book = deep_book();
    c.bench_function("simulate_market_sell", |b| {
        b.iter(|| simulate_market_sell(black_box(&book), black_box(10_000.0)))
    });
}

fn bench_market_buy(c: &mut Criterion) {
    let book = deep_book();
    c.bench_function("simulate_market_buy", |b| {
        b.iter(|| simulate_market_buy(black_box(&book), black_box(10_000.0)))
    });
}

criterion_group!(benches, bench_market_sell, bench_market_buy);
criterion_main!(benches);
