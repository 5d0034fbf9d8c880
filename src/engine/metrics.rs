use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Monotonic engine counters. Writers are many
/// concurrent pipeline tasks; readers (the metrics endpoint) may observe
/// any recent consistent snapshot; no total ordering is required.
#[derive(Debug, Default)]
pub struct Metrics {
    processed: AtomicU64,
    executed: AtomicU64,
    skipped: AtomicU64,
    gas_spent: AtomicU64,
    profit_raw: AtomicU64,
}

/// Point-in-time read of every counter.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    pub processed: u64,
    pub executed: u64,
    pub skipped: u64,
    pub gas_spent: u64,
    pub profit_raw: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_executed(&self) {
        self.executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_gas_spent(&self, gas: u64) {
        self.gas_spent.fetch_add(gas, Ordering::Relaxed);
    }

    pub fn add_profit(&self, profit: u64) {
        self.profit_raw.fetch_add(profit, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            processed: self.processed.load(Ordering::Relaxed),
            executed: self.executed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            gas_spent: self.gas_spent.load(Ordering::Relaxed),
            profit_raw: self.profit_raw.load(Ordering::Relaxed),
        }
    }

    pub fn log(&self) {
        let snapshot = self.snapshot();
        info!(
            "METRICS: processed={} executed={} skipped={} gas_spent={} profit_raw={}",
            snapshot.processed, snapshot.executed, snapshot.skipped, snapshot.gas_spent, snapshot.profit_raw
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn concurrent_increments_are_exact() {
        let metrics = Arc::new(Metrics::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let metrics = metrics.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    metrics.inc_processed();
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(metrics.snapshot().processed, 1000);
    }
}
