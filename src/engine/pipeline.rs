use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{debug, info, warn};

use crate::clob::QuoteProvider;
use crate::engine::metrics::Metrics;
use crate::engine::processing_set::ProcessingSet;
use crate::engine::ptb::{InventoryClient, PtbAssembler};
use crate::error::{Result, SolverError};
use crate::registry::{fetch_intent, Intent, IntentStatus, TxBuilder};
use crate::rpc::RpcClient;
use crate::signing::Signer;
use crate::utils::time::now_ts;

/// `profit_raw * 10000 / intent.input_amount`. The numerator is
/// output-denominated, the denominator input-denominated; this mismatch
/// is intentional, preserved verbatim.
pub fn profit_bps(profit_raw: u64, input_amount: u64) -> u64 {
    if input_amount == 0 {
        return 0;
    }
    profit_raw * 10_000 / input_amount
}

pub struct Pipeline {
    rpc: Arc<RpcClient>,
    quoter: Arc<dyn QuoteProvider>,
    tx_builder: Arc<TxBuilder>,
    processing_set: ProcessingSet,
    metrics: Arc<Metrics>,
    signer: Arc<dyn Signer>,
    deepbook_package_id: String,
    deep_coin_type: String,
    min_profit_bps: u64,
    max_gas_price: u64,
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rpc: Arc<RpcClient>,
        quoter: Arc<dyn QuoteProvider>,
        tx_builder: Arc<TxBuilder>,
        processing_set: ProcessingSet,
        metrics: Arc<Metrics>,
        signer: Arc<dyn Signer>,
        deepbook_package_id: String,
        deep_coin_type: String,
        min_profit_bps: u64,
        max_gas_price: u64,
    ) -> Self {
        Self {
            rpc,
            quoter,
            tx_builder,
            processing_set,
            metrics,
            signer,
            deepbook_package_id,
            deep_coin_type,
            min_profit_bps,
            max_gas_price,
        }
    }

    pub fn processing_set(&self) -> &ProcessingSet {
        &self.processing_set
    }

    /// No-op if `id` is already under analysis or execution.
    pub async fn process(&self, intent_id: &str) {
        let Some(_guard) = self.processing_set.try_claim(intent_id) else {
            debug!("intent {intent_id} already in flight, skipping");
            return;
        };

        self.metrics.inc_processed();
        if let Err(e) = self.run(intent_id).await {
            warn!("pipeline error for intent {intent_id}: {e}");
        }
    }

    async fn run(&self, intent_id: &str) -> Result<()> {
        let intent = match fetch_intent(&self.rpc, intent_id).await {
            Ok(intent) => intent,
            Err(SolverError::NotFound(_)) => return Ok(()),
            Err(e) => return Err(e),
        };

        if intent.status != IntentStatus::Open {
            return Ok(());
        }

        let now_ms = now_ts();
        if intent.is_expired(now_ms) {
            self.cleanup_expired(&intent.intent_id, &intent.input_type, &intent.output_type).await;
            return Ok(());
        }

        self.evaluate(&intent).await
    }

    /// Quotes `intent` and either skips it (profit below threshold) or
    /// hands it to `execute`. Split out from `run` so the skip/execute
    /// decision can be exercised directly against a stub `QuoteProvider`,
    /// without a live RPC connection to fetch the intent first.
    async fn evaluate(&self, intent: &Intent) -> Result<()> {
        let quote = self
            .quoter
            .quote(&intent.input_type, &intent.output_type, intent.input_balance)
            .await?;

        let profit_raw = quote.output_raw.saturating_sub(intent.min_output_amount);
        let bps = profit_bps(profit_raw, intent.input_balance);

        if bps < self.min_profit_bps {
            debug!("intent {} profit_bps={bps} below threshold, skipping", intent.intent_id);
            self.metrics.inc_skipped();
            return Ok(());
        }

        self.execute(intent, profit_raw).await
    }

    async fn execute(&self, intent: &crate::registry::Intent, profit_raw: u64) -> Result<()> {
        let pool = self
            .quoter
            .registry()
            .find_pool(&intent.input_type, &intent.output_type)
            .ok_or(SolverError::NoPool)?
            .clone();

        let solver_address = hex::encode(self.signer.pubkey());
        let inventory = InventoryClient::new(&self.rpc, &solver_address);

        let (output_coins, _total) = inventory
            .select_output_coins(&intent.output_type, intent.min_output_amount)
            .await?;

        let fee_coin = inventory.fee_coin(&self.deep_coin_type).await?;

        let assembler = PtbAssembler::new(&self.tx_builder, &self.deepbook_package_id);
        let steps = assembler.build(intent, &pool, &output_coins, &fee_coin.coin_id, &solver_address);

        let tx_bytes = self
            .rpc
            .build_unsigned_ptb(&steps, &solver_address, self.max_gas_price)
            .await?;

        let signature_bytes = self.signer.sign(tx_bytes.as_bytes());
        let signature = BASE64.encode(signature_bytes);

        match self.rpc.execute_signed(&tx_bytes, &signature).await {
            Ok(result) => {
                self.metrics.inc_executed();
                self.metrics.add_gas_spent(result.gas_used);
                self.metrics.add_profit(profit_raw);
                info!("executed intent {} digest={}", intent.intent_id, result.digest);
                Ok(())
            }
            Err(SolverError::Reverted { code, reason }) => {
                warn!("intent {} reverted: code={code} reason={reason}", intent.intent_id);
                Ok(())
            }
            Err(e @ SolverError::Transient(_)) => {
                debug!("intent {} transient failure: {e}; next poll will retry", intent.intent_id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn cleanup_expired(&self, intent_id: &str, input_type: &str, output_type: &str) {
        let plan = self.tx_builder.plan_cleanup_expired(intent_id, input_type, output_type);
        let solver_address = hex::encode(self.signer.pubkey());

        let tx_bytes = match self.rpc.build_unsigned(&plan, &solver_address).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("failed to build cleanup tx for {intent_id}: {e}");
                return;
            }
        };

        let signature = BASE64.encode(self.signer.sign(tx_bytes.as_bytes()));
        if let Err(e) = self.rpc.execute_signed(&tx_bytes, &signature).await {
            debug!("cleanup for {intent_id} failed (swallowed): {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clob::{PoolRegistry, SwapQuote};
    use crate::registry::IntentStatus;
    use crate::signing::Ed25519Signer;

    #[test]
    fn profit_bps_uses_mismatched_units_verbatim() {
        // 1_000_000_000 SUI input, 400 profit_raw (output units): bps truncates to 0.
        assert_eq!(profit_bps(400, 1_000_000_000), 0);
    }

    #[test]
    fn profit_bps_zero_input_is_zero_not_a_panic() {
        assert_eq!(profit_bps(100, 0), 0);
    }

    /// Always returns the same quote, regardless of input. Lets tests
    /// drive `Pipeline::evaluate`'s skip/execute decision without a live
    /// RPC or CLOB connection.
    struct StubQuoter {
        output_raw: u64,
        registry: PoolRegistry,
    }

    #[async_trait::async_trait]
    impl QuoteProvider for StubQuoter {
        async fn quote(&self, _input_type: &str, _output_type: &str, input_raw: u64) -> Result<SwapQuote> {
            Ok(SwapQuote {
                input_raw,
                output_raw: self.output_raw,
                mid_price: 1.0,
                best_bid: 1.0,
                best_ask: 1.0,
                price_impact_pct: 0.0,
                route: vec![],
            })
        }

        fn registry(&self) -> &PoolRegistry {
            &self.registry
        }
    }

    fn sample_intent() -> Intent {
        Intent {
            intent_id: "0xintent".to_string(),
            owner: "0xowner".to_string(),
            input_type: "0x2::sui::SUI".to_string(),
            output_type: "0x2::usdc::USDC".to_string(),
            input_balance: 1_000_000_000,
            min_output_amount: 1_800_000,
            deadline: u64::MAX,
            status: IntentStatus::Open,
            solver: None,
        }
    }

    fn test_pipeline(quoter: Arc<dyn QuoteProvider>) -> Pipeline {
        Pipeline::new(
            Arc::new(RpcClient::new("http://127.0.0.1:0").unwrap()),
            quoter,
            Arc::new(TxBuilder::new("0xpkg", "0xcfg")),
            ProcessingSet::new(),
            Arc::new(Metrics::new()),
            Arc::new(Ed25519Signer::generate()),
            "0xdeepbook".to_string(),
            "0x2::deep::DEEP".to_string(),
            50,
            1_000,
        )
    }

    #[tokio::test]
    async fn evaluate_skips_when_profit_is_below_threshold() {
        // quote output below min_output_amount: profit_raw saturates to 0, well under threshold.
        let quoter = Arc::new(StubQuoter { output_raw: 1_700_000, registry: PoolRegistry::new() });
        let pipeline = test_pipeline(quoter);

        let result = pipeline.evaluate(&sample_intent()).await;

        assert!(result.is_ok());
        assert_eq!(pipeline.metrics.snapshot().skipped, 1);
        assert_eq!(pipeline.metrics.snapshot().executed, 0);
    }
}
