use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::error::SolverError;

#[derive(Deserialize)]
pub struct PriceRequest {
    pub pair: String,
}

#[derive(Serialize)]
pub struct PriceResponse {
    pub success: bool,
    pub mid_price: f64,
    pub best_bid: f64,
    pub best_ask: f64,
}

pub async fn price(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PriceRequest>,
) -> Result<Json<PriceResponse>, ApiError> {
    let (base_alias, quote_alias) = req
        .pair
        .split_once('_')
        .ok_or_else(|| ApiError::bad_request("pair must be formatted as BASE_QUOTE"))?;

    let base_type = state.config.resolve_alias(base_alias);
    let quote_type = state.config.resolve_alias(quote_alias);

    let pool = state
        .quoter
        .registry()
        .find_pool(&base_type, &quote_type)
        .ok_or(SolverError::NoPool)?
        .clone();

    let book = state.quoter.level2(&pool).await?;
    let mid_price = book.mid_price().ok_or(SolverError::NoLiquidity)?;

    Ok(Json(PriceResponse {
        success: true,
        mid_price,
        best_bid: book.best_bid().unwrap_or(0.0),
        best_ask: book.best_ask().unwrap_or(0.0),
    }))
}
