use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Serialize)]
pub struct PoolSummary {
    pub pool_id: String,
    pub base_type: String,
    pub quote_type: String,
}

#[derive(Serialize)]
pub struct PoolsResponse {
    pub success: bool,
    pub pools: Vec<PoolSummary>,
    pub aliases: std::collections::HashMap<String, String>,
}

pub async fn pools(State(state): State<Arc<AppState>>) -> Json<PoolsResponse> {
    let pools = state
        .quoter
        .registry()
        .iter()
        .map(|p| PoolSummary {
            pool_id: p.pool_id.clone(),
            base_type: p.base_type.clone(),
            quote_type: p.quote_type.clone(),
        })
        .collect();

    Json(PoolsResponse {
        success: true,
        pools,
        aliases: state.config.token_aliases.clone(),
    })
}
