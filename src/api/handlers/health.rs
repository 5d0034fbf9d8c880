use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub rpc_url: String,
    pub package_id: String,
    pub min_profit_bps: u64,
    pub pools_registered: usize,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        rpc_url: state.config.rpc_url.clone(),
        package_id: state.config.package_id.clone(),
        min_profit_bps: state.config.min_profit_bps,
        pools_registered: state.quoter.registry().len(),
    })
}
