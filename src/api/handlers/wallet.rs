use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::aliases::raw_to_human;
use crate::api::error::ApiError;
use crate::api::state::AppState;

#[derive(Deserialize)]
pub struct BalanceRequest {
    pub address: String,
}

#[derive(Serialize)]
pub struct AssetBalance {
    pub alias: String,
    pub asset_type: String,
    pub raw: u64,
    pub human: f64,
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub success: bool,
    pub balances: Vec<AssetBalance>,
}

pub async fn balance(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BalanceRequest>,
) -> Result<Json<BalanceResponse>, ApiError> {
    if req.address.is_empty() {
        return Err(ApiError::bad_request("address must be non-empty"));
    }

    let mut balances = Vec::new();
    for (alias, asset_type) in &state.config.token_aliases {
        let coins = state.rpc.get_coins(&req.address, asset_type).await?;
        let raw: u64 = coins.iter().map(|c| c.balance).sum();
        balances.push(AssetBalance {
            alias: alias.clone(),
            asset_type: asset_type.clone(),
            raw,
            human: raw_to_human(raw, asset_type, &state.config),
        });
    }
    Ok(Json(BalanceResponse { success: true, balances }))
}
