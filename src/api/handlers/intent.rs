use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::aliases::raw_to_human;
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::registry::fetch_intent;
use crate::utils::time::now_ts;

#[derive(Deserialize)]
pub struct IntentRequest {
    pub id: String,
}

#[derive(Serialize)]
pub struct IntentResponse {
    pub success: bool,
    pub intent_id: String,
    pub owner: String,
    pub input_type: String,
    pub output_type: String,
    pub input_amount_human: f64,
    pub min_output_amount_human: f64,
    pub input_balance_raw: u64,
    pub min_output_amount_raw: u64,
    pub deadline: u64,
    pub status: &'static str,
    pub is_expired: bool,
    pub solver: Option<String>,
}

pub async fn intent(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IntentRequest>,
) -> Result<Json<IntentResponse>, ApiError> {
    if req.id.is_empty() {
        return Err(ApiError::bad_request("id must be non-empty"));
    }

    let intent = fetch_intent(&state.rpc, &req.id).await?;
    let now_ms = now_ts();

    Ok(Json(IntentResponse {
        success: true,
        intent_id: intent.intent_id.clone(),
        owner: intent.owner.clone(),
        input_type: intent.input_type.clone(),
        output_type: intent.output_type.clone(),
        input_amount_human: raw_to_human(intent.input_balance, &intent.input_type, &state.config),
        min_output_amount_human: raw_to_human(intent.min_output_amount, &intent.output_type, &state.config),
        input_balance_raw: intent.input_balance,
        min_output_amount_raw: intent.min_output_amount,
        deadline: intent.deadline,
        status: status_label(&intent.status),
        is_expired: intent.is_expired(now_ms),
        solver: intent.solver.clone(),
    }))
}

fn status_label(status: &crate::registry::IntentStatus) -> &'static str {
    use crate::registry::IntentStatus;
    match status {
        IntentStatus::Open => "OPEN",
        IntentStatus::Completed => "COMPLETED",
        IntentStatus::Cancelled => "CANCELLED",
        IntentStatus::Expired => "EXPIRED",
    }
}
