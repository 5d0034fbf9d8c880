use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::engine::pipeline::Pipeline;
use crate::registry::{fetch_created_events, IntentEvent};
use crate::rpc::RpcClient;

/// Fires on a fixed interval, pulling the newest `limit` `IntentCreated`
/// events and feeding each into the pipeline.
pub struct Poller {
    rpc: Arc<RpcClient>,
    pipeline: Arc<Pipeline>,
    package_id: String,
    interval: Duration,
    limit: usize,
}

impl Poller {
    pub fn new(rpc: Arc<RpcClient>, pipeline: Arc<Pipeline>, package_id: String, interval_ms: u64, limit: usize) -> Self {
        Self {
            rpc,
            pipeline,
            package_id,
            interval: Duration::from_millis(interval_ms),
            limit,
        }
    }

    /// Runs until `stop` resolves; intended to be spawned as a background
    /// task.
    pub async fn run(&self, mut stop: tokio::sync::watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
                _ = stop.changed() => {
                    if *stop.borrow() {
                        debug!("poller stopping");
                        return;
                    }
                }
            }
        }
    }

    async fn poll_once(&self) {
        let events = match fetch_created_events(&self.rpc, &self.package_id, self.limit).await {
            Ok(events) => events,
            Err(e) => {
                warn!("poll failed: {e}");
                return;
            }
        };

        for event in events {
            if let IntentEvent::Created { intent_id, .. } = event {
                let pipeline = self.pipeline.clone();
                tokio::spawn(async move {
                    pipeline.process(&intent_id).await;
                });
            }
        }
    }
}
