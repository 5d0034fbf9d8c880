use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::clob::Quoter;
use crate::config::Config;
use crate::engine::metrics::Metrics;
use crate::engine::pipeline::Pipeline;
use crate::engine::poller::Poller;
use crate::engine::processing_set::ProcessingSet;
use crate::error::{Result, SolverError};
use crate::registry::{IntentEvent, TxBuilder};
use crate::rpc::subscription::Unsubscribe;
use crate::rpc::{EventSubscriber, RpcClient};
use crate::signing::Signer;

/// Top-level wiring for C4: owns the poller, the push-subscription task,
/// and the shared pipeline/metrics/processing-set state.
pub struct SolverEngine {
    rpc: Arc<RpcClient>,
    quoter: Arc<Quoter>,
    pipeline: Arc<Pipeline>,
    metrics: Arc<Metrics>,
    processing_set: ProcessingSet,
    config: Config,
    stop_tx: watch::Sender<bool>,
    stop_rx: watch::Receiver<bool>,
    tasks: Vec<JoinHandle<()>>,
    subscription: Option<Unsubscribe>,
}

impl SolverEngine {
    pub fn new(config: Config, rpc: Arc<RpcClient>, quoter: Arc<Quoter>, signer: Arc<dyn Signer>) -> Self {
        let tx_builder = Arc::new(TxBuilder::new(config.package_id.clone(), config.protocol_config_id.clone()));
        let metrics = Arc::new(Metrics::new());
        let processing_set = ProcessingSet::new();
        let deep_coin_type = config.resolve_alias("DEEP");

        let pipeline = Arc::new(Pipeline::new(
            rpc.clone(),
            quoter.clone(),
            tx_builder,
            processing_set.clone(),
            metrics.clone(),
            signer,
            config.deepbook_package_id.clone(),
            deep_coin_type,
            config.min_profit_bps,
            config.max_gas_price,
        ));

        let (stop_tx, stop_rx) = watch::channel(false);

        Self {
            rpc,
            quoter,
            pipeline,
            metrics,
            processing_set,
            config,
            stop_tx,
            stop_rx,
            tasks: Vec::new(),
            subscription: None,
        }
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    pub fn processing_set(&self) -> ProcessingSet {
        self.processing_set.clone()
    }

    pub fn pipeline(&self) -> Arc<Pipeline> {
        self.pipeline.clone()
    }

    /// Confirms CLOB connectivity with one synchronous quote before any
    /// background task starts; failure aborts startup.
    pub async fn cold_start_check(&self, sui_type: &str, usdc_type: &str, one_sui_raw: u64) -> Result<()> {
        self.quoter
            .quote(sui_type, usdc_type, one_sui_raw)
            .await
            .map(|_| ())
            .map_err(|e| SolverError::Fatal(format!("cold start quote check failed: {e}")))
    }

    /// Spawns the poller and, if enabled, the push-subscription task.
    pub fn start(&mut self) {
        let poller = Poller::new(
            self.rpc.clone(),
            self.pipeline.clone(),
            self.config.package_id.clone(),
            self.config.polling_interval_ms,
            self.config.poll_event_limit,
        );
        let stop_rx = self.stop_rx.clone();
        self.tasks.push(tokio::spawn(async move {
            poller.run(stop_rx).await;
        }));

        if self.config.enable_events {
            let subscriber = EventSubscriber::new(self.config.ws_url.clone());
            let move_event_type = format!("{}::intent::IntentCreated", self.config.package_id);
            let (mut rx, unsubscribe) = subscriber.subscribe_events(&move_event_type);
            self.subscription = Some(unsubscribe);

            let pipeline = self.pipeline.clone();
            self.tasks.push(tokio::spawn(async move {
                while let Some(envelope) = rx.recv().await {
                    if let Ok(IntentEvent::Created { intent_id, .. }) = crate::registry::parse_event(&envelope) {
                        let pipeline = pipeline.clone();
                        tokio::spawn(async move {
                            pipeline.process(&intent_id).await;
                        });
                    }
                }
            }));
        } else {
            info!("event subscription disabled (ENABLE_EVENTS=false); polling only");
        }
    }

    /// Signals background tasks to stop and drains the processing set.
    pub async fn stop(mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(sub) = self.subscription.take() {
            sub.close();
        }
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
        while !self.processing_set.is_empty() {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        warn!("solver engine stopped");
    }
}
