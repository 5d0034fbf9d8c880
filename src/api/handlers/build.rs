use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::aliases::human_to_raw;
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::registry::fetch_intent;
use crate::rpc::types::TxArg;

#[derive(Serialize)]
pub struct BuildResponse {
    pub success: bool,
    pub tx_bytes: String,
}

#[derive(Deserialize)]
pub struct BuildCreateRequest {
    pub input_coin: String,
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub min_output_amount: f64,
    pub deadline_delta_ms: u64,
    pub sender: String,
}

/// Wallet-safe: returns unsigned transaction bytes only, never signs.
pub async fn build_create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BuildCreateRequest>,
) -> Result<Json<BuildResponse>, ApiError> {
    if req.input_coin.is_empty() || req.from.is_empty() || req.to.is_empty() || req.sender.is_empty() {
        return Err(ApiError::bad_request("input_coin, from, to, and sender must be non-empty"));
    }
    if !(req.amount > 0.0) || !(req.min_output_amount > 0.0) {
        return Err(ApiError::bad_request("amount and min_output_amount must be greater than zero"));
    }
    if req.deadline_delta_ms == 0 {
        return Err(ApiError::bad_request("deadline_delta_ms must be greater than zero"));
    }

    let input_type = state.config.resolve_alias(&req.from);
    let output_type = state.config.resolve_alias(&req.to);
    let min_output_raw = human_to_raw(req.min_output_amount, &output_type, &state.config);

    let plan = state
        .tx_builder
        .plan_create(&req.input_coin, &input_type, &output_type, min_output_raw, req.deadline_delta_ms);

    let tx_bytes = state.rpc.build_unsigned(&plan, &req.sender).await?;
    Ok(Json(BuildResponse { success: true, tx_bytes }))
}

#[derive(Deserialize)]
pub struct BuildExecuteRequest {
    pub intent_id: String,
    pub output_coin: String,
    pub sender: String,
}

pub async fn build_execute(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BuildExecuteRequest>,
) -> Result<Json<BuildResponse>, ApiError> {
    if req.intent_id.is_empty() || req.output_coin.is_empty() || req.sender.is_empty() {
        return Err(ApiError::bad_request("intent_id, output_coin, and sender must be non-empty"));
    }

    let intent = fetch_intent(&state.rpc, &req.intent_id).await?;
    let plan = state.tx_builder.plan_execute(
        &req.intent_id,
        TxArg::Object(req.output_coin.clone()),
        &intent.input_type,
        &intent.output_type,
    );
    let tx_bytes = state.rpc.build_unsigned(&plan, &req.sender).await?;
    Ok(Json(BuildResponse { success: true, tx_bytes }))
}

#[derive(Deserialize)]
pub struct BuildCancelRequest {
    pub intent_id: String,
    pub sender: String,
}

pub async fn build_cancel(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BuildCancelRequest>,
) -> Result<Json<BuildResponse>, ApiError> {
    if req.intent_id.is_empty() || req.sender.is_empty() {
        return Err(ApiError::bad_request("intent_id and sender must be non-empty"));
    }

    let intent = fetch_intent(&state.rpc, &req.intent_id).await?;
    let plan = state.tx_builder.plan_cancel(&req.intent_id, &intent.input_type, &intent.output_type);
    let tx_bytes = state.rpc.build_unsigned(&plan, &req.sender).await?;
    Ok(Json(BuildResponse { success: true, tx_bytes }))
}
