use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::error::SolverError;

#[derive(Deserialize)]
pub struct OrderbookRequest {
    pub base: String,
    pub quote: String,
}

#[derive(Serialize)]
pub struct LevelDto {
    pub price: f64,
    pub quantity: f64,
}

#[derive(Serialize)]
pub struct OrderbookResponse {
    pub success: bool,
    pub bids: Vec<LevelDto>,
    pub asks: Vec<LevelDto>,
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
    pub mid_price: Option<f64>,
}

pub async fn orderbook(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OrderbookRequest>,
) -> Result<Json<OrderbookResponse>, ApiError> {
    if req.base.is_empty() || req.quote.is_empty() {
        return Err(ApiError::bad_request("base and quote must be non-empty"));
    }

    let base_type = state.config.resolve_alias(&req.base);
    let quote_type = state.config.resolve_alias(&req.quote);

    let pool = state
        .quoter
        .registry()
        .find_pool(&base_type, &quote_type)
        .ok_or(SolverError::NoPool)?
        .clone();

    let book = state.quoter.level2(&pool).await?;

    Ok(Json(OrderbookResponse {
        success: true,
        best_bid: book.best_bid(),
        best_ask: book.best_ask(),
        mid_price: book.mid_price(),
        bids: book.bids.iter().map(|l| LevelDto { price: l.price, quantity: l.quantity }).collect(),
        asks: book.asks.iter().map(|l| LevelDto { price: l.price, quantity: l.quantity }).collect(),
    }))
}
