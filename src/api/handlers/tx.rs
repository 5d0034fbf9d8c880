use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::state::AppState;

#[derive(Deserialize)]
pub struct ExecuteTxRequest {
    pub tx_bytes: String,
    pub signature: String,
}

#[derive(Serialize)]
pub struct ExecuteTxResponse {
    pub success: bool,
    pub digest: String,
    pub gas_used: u64,
}

/// Relays an already-signed transaction built client-side, e.g. by
/// `/intent/build/*`. The façade never sees the signer's key.
pub async fn execute_tx(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExecuteTxRequest>,
) -> Result<Json<ExecuteTxResponse>, ApiError> {
    if req.tx_bytes.is_empty() || req.signature.is_empty() {
        return Err(ApiError::bad_request("tx_bytes and signature must be non-empty"));
    }

    let result = state.rpc.execute_signed(&req.tx_bytes, &req.signature).await?;
    Ok(Json(ExecuteTxResponse {
        success: true,
        digest: result.digest,
        gas_used: result.gas_used,
    }))
}
