use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use axum::extract::State;
use axum::Json;

use crate::api::aliases::human_to_raw;
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::engine::{required_output_with_buffer, select_coins, PtbAssembler};
use crate::error::SolverError;
use crate::registry::fetch_intent;
use crate::signing::Signer;

#[derive(Serialize)]
pub struct TxSubmitResponse {
    pub success: bool,
    pub digest: String,
    pub gas_used: u64,
}

/// Test-only convenience: opens an intent with the server-held test-user
/// key. A wallet-based integration should use `/intent/build/create`
/// followed by `/tx/execute` instead.
#[derive(Deserialize)]
pub struct CreateIntentRequest {
    pub input_coin: String,
    pub from: String,
    pub to: String,
    pub min_output_amount: f64,
    pub deadline_delta_ms: u64,
}

pub async fn create_intent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateIntentRequest>,
) -> Result<Json<TxSubmitResponse>, ApiError> {
    if req.input_coin.is_empty() || req.from.is_empty() || req.to.is_empty() {
        return Err(ApiError::bad_request("input_coin, from, and to must be non-empty"));
    }
    if !(req.min_output_amount > 0.0) {
        return Err(ApiError::bad_request("min_output_amount must be greater than zero"));
    }
    if req.deadline_delta_ms == 0 {
        return Err(ApiError::bad_request("deadline_delta_ms must be greater than zero"));
    }

    let signer = state
        .test_user_signer
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("server has no test user key configured"))?;

    let input_type = state.config.resolve_alias(&req.from);
    let output_type = state.config.resolve_alias(&req.to);
    let min_output_raw = human_to_raw(req.min_output_amount, &output_type, &state.config);

    let plan = state
        .tx_builder
        .plan_create(&req.input_coin, &input_type, &output_type, min_output_raw, req.deadline_delta_ms);

    let sender = hex::encode(signer.pubkey());
    let tx_bytes = state.rpc.build_unsigned(&plan, &sender).await?;
    let signature = BASE64.encode(signer.sign(tx_bytes.as_bytes()));
    let result = state.rpc.execute_signed(&tx_bytes, &signature).await?;

    Ok(Json(TxSubmitResponse { success: true, digest: result.digest, gas_used: result.gas_used }))
}

/// Runs the same logic the background engine runs, on demand, with the
/// server-held solver key. Exists for manual/test triggering; the
/// background engine does not call this path.
#[derive(Deserialize)]
pub struct ExecuteIntentRequest {
    pub intent_id: String,
}

pub async fn execute_intent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExecuteIntentRequest>,
) -> Result<Json<TxSubmitResponse>, ApiError> {
    if req.intent_id.is_empty() {
        return Err(ApiError::bad_request("intent_id must be non-empty"));
    }

    let signer = state
        .solver_signer
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("server has no solver key configured"))?;

    let intent = fetch_intent(&state.rpc, &req.intent_id).await?;
    if intent.status != crate::registry::IntentStatus::Open {
        return Err(ApiError::bad_request("intent is not open"));
    }

    let quote = state
        .quoter
        .quote(&intent.input_type, &intent.output_type, intent.input_balance)
        .await?;
    let profit_raw = quote.output_raw.saturating_sub(intent.min_output_amount);

    let pool = state
        .quoter
        .registry()
        .find_pool(&intent.input_type, &intent.output_type)
        .ok_or(SolverError::NoPool)?
        .clone();

    let solver_address = hex::encode(signer.pubkey());
    let output_coins = state.rpc.get_coins(&solver_address, &intent.output_type).await?;
    let target = required_output_with_buffer(intent.min_output_amount);
    let (selected, _total) = select_coins(&output_coins, target)?;

    let deep_coin_type = state.config.resolve_alias("DEEP");
    let fee_coins = state.rpc.get_coins(&solver_address, &deep_coin_type).await?;
    let fee_coin = fee_coins.first().ok_or(SolverError::NoFeeCoin)?;

    let assembler = PtbAssembler::new(&state.tx_builder, &state.config.deepbook_package_id);
    let steps = assembler.build(&intent, &pool, &selected, &fee_coin.coin_id, &solver_address);

    let tx_bytes = state.rpc.build_unsigned_ptb(&steps, &solver_address, state.config.max_gas_price).await?;
    let signature = BASE64.encode(signer.sign(tx_bytes.as_bytes()));
    let result = state.rpc.execute_signed(&tx_bytes, &signature).await?;

    state.metrics.inc_executed();
    state.metrics.add_gas_spent(result.gas_used);
    state.metrics.add_profit(profit_raw);

    Ok(Json(TxSubmitResponse { success: true, digest: result.digest, gas_used: result.gas_used }))
}

/// Owner-only on-chain; the façade does not hold owner keys, so this
/// relies on the caller supplying a pre-signed cancellation via
/// `/tx/execute` in production. This endpoint is kept for the test
/// harness, which reuses the test-user key as its own owner key.
#[derive(Deserialize)]
pub struct CancelIntentRequest {
    pub intent_id: String,
}

pub async fn cancel_intent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CancelIntentRequest>,
) -> Result<Json<TxSubmitResponse>, ApiError> {
    if req.intent_id.is_empty() {
        return Err(ApiError::bad_request("intent_id must be non-empty"));
    }

    let signer = state
        .test_user_signer
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("server has no owner key configured"))?;

    let intent = fetch_intent(&state.rpc, &req.intent_id).await?;
    let plan = state.tx_builder.plan_cancel(&req.intent_id, &intent.input_type, &intent.output_type);

    let sender = hex::encode(signer.pubkey());
    let tx_bytes = state.rpc.build_unsigned(&plan, &sender).await?;
    let signature = BASE64.encode(signer.sign(tx_bytes.as_bytes()));
    let result = state.rpc.execute_signed(&tx_bytes, &signature).await?;

    Ok(Json(TxSubmitResponse { success: true, digest: result.digest, gas_used: result.gas_used }))
}
