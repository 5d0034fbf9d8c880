use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::registry::fetch_config;

#[derive(Deserialize, Default)]
pub struct ConfigRequest {
    pub config_id: Option<String>,
}

#[derive(Serialize)]
pub struct ConfigResponse {
    pub success: bool,
    pub fee_bps: u64,
    pub fee_recipient: String,
    pub paused: bool,
}

pub async fn protocol_config(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConfigRequest>,
) -> Result<Json<ConfigResponse>, ApiError> {
    if req.config_id.as_deref() == Some("") {
        return Err(ApiError::bad_request("config_id must be non-empty when provided"));
    }
    let config_id = req.config_id.as_deref().unwrap_or(&state.config.protocol_config_id);
    let config = fetch_config(&state.rpc, config_id).await?;

    Ok(Json(ConfigResponse {
        success: true,
        fee_bps: config.fee_bps,
        fee_recipient: config.fee_recipient,
        paused: config.paused,
    }))
}
