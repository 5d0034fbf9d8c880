use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::registry::{fetch_created_events, fetch_executed_events, fetch_intent, IntentEvent, IntentStatus};
use crate::utils::time::now_ts;

const DEFAULT_LIMIT: usize = 50;

#[derive(Deserialize, Default)]
pub struct OpenIntentsRequest {
    pub limit: Option<usize>,
    #[serde(default)]
    pub include_expired: bool,
}

#[derive(Serialize)]
pub struct OpenIntentSummary {
    pub intent_id: String,
    pub owner: String,
    pub input_type: String,
    pub output_type: String,
    pub input_balance: u64,
    pub min_output_amount: u64,
    pub deadline: u64,
    pub is_expired: bool,
}

#[derive(Serialize)]
pub struct OpenIntentsResponse {
    pub success: bool,
    pub intents: Vec<OpenIntentSummary>,
}

pub async fn open_intents(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OpenIntentsRequest>,
) -> Result<Json<OpenIntentsResponse>, ApiError> {
    if req.limit == Some(0) {
        return Err(ApiError::bad_request("limit must be greater than zero"));
    }
    let limit = req.limit.unwrap_or(DEFAULT_LIMIT);
    let created = fetch_created_events(&state.rpc, &state.config.package_id, limit).await?;

    let ids: Vec<String> = created
        .into_iter()
        .filter_map(|e| match e {
            IntentEvent::Created { intent_id, .. } => Some(intent_id),
            _ => None,
        })
        .collect();

    let fetches = ids.iter().map(|id| fetch_intent(&state.rpc, id));
    let results = join_all(fetches).await;

    let now_ms = now_ts();
    let mut intents = Vec::new();
    for result in results {
        match result {
            Ok(intent) => {
                let expired = intent.is_expired(now_ms);
                if intent.status == IntentStatus::Open && (req.include_expired || !expired) {
                    intents.push(OpenIntentSummary {
                        intent_id: intent.intent_id,
                        owner: intent.owner,
                        input_type: intent.input_type,
                        output_type: intent.output_type,
                        input_balance: intent.input_balance,
                        min_output_amount: intent.min_output_amount,
                        deadline: intent.deadline,
                        is_expired: expired,
                    });
                }
            }
            Err(e) => debug!("skipping intent in open_intents listing: {e}"),
        }
    }

    Ok(Json(OpenIntentsResponse { success: true, intents }))
}

#[derive(Deserialize, Default)]
pub struct HistoryRequest {
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct HistoryEntry {
    pub kind: &'static str,
    pub intent_id: String,
    pub detail: serde_json::Value,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub entries: Vec<HistoryEntry>,
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    Json(req): Json<HistoryRequest>,
) -> Result<Json<HistoryResponse>, ApiError> {
    if req.limit == Some(0) {
        return Err(ApiError::bad_request("limit must be greater than zero"));
    }
    let limit = req.limit.unwrap_or(DEFAULT_LIMIT);

    let (created, executed) = tokio::join!(
        fetch_created_events(&state.rpc, &state.config.package_id, limit),
        fetch_executed_events(&state.rpc, &state.config.package_id, limit),
    );

    let mut entries = Vec::new();
    for event in created? {
        if let IntentEvent::Created { intent_id, owner, input_amount, min_output_amount, deadline, .. } = event {
            entries.push(HistoryEntry {
                kind: "created",
                intent_id,
                detail: serde_json::json!({
                    "owner": owner,
                    "input_amount": input_amount,
                    "min_output_amount": min_output_amount,
                    "deadline": deadline,
                }),
            });
        }
    }
    for event in executed? {
        if let IntentEvent::Executed { intent_id, solver, input_amount, output_amount, fee_amount, execution_time } = event {
            entries.push(HistoryEntry {
                kind: "executed",
                intent_id,
                detail: serde_json::json!({
                    "solver": solver,
                    "input_amount": input_amount,
                    "output_amount": output_amount,
                    "fee_amount": fee_amount,
                    "execution_time": execution_time,
                }),
            });
        }
    }

    Ok(Json(HistoryResponse { success: true, entries }))
}
