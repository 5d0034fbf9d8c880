use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::aliases::{human_to_raw, raw_to_human};
use crate::api::error::ApiError;
use crate::api::state::AppState;

#[derive(Deserialize)]
pub struct QuoteRequest {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

#[derive(Serialize)]
pub struct QuoteResponse {
    pub success: bool,
    pub input_human: f64,
    pub output_human: f64,
    pub input_raw: u64,
    pub output_raw: u64,
    pub mid_price: f64,
    pub best_bid: f64,
    pub best_ask: f64,
    pub price_impact_pct: f64,
    pub route: Vec<String>,
}

pub async fn quote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, ApiError> {
    if req.from.is_empty() || req.to.is_empty() {
        return Err(ApiError::bad_request("from and to must be non-empty"));
    }
    if !(req.amount > 0.0) {
        return Err(ApiError::bad_request("amount must be greater than zero"));
    }

    let input_type = state.config.resolve_alias(&req.from);
    let output_type = state.config.resolve_alias(&req.to);
    let input_raw = human_to_raw(req.amount, &input_type, &state.config);

    let result = state.quoter.quote(&input_type, &output_type, input_raw).await?;

    Ok(Json(QuoteResponse {
        success: true,
        input_human: req.amount,
        output_human: raw_to_human(result.output_raw, &output_type, &state.config),
        input_raw: result.input_raw,
        output_raw: result.output_raw,
        mid_price: result.mid_price,
        best_bid: result.best_bid,
        best_ask: result.best_ask,
        price_impact_pct: result.price_impact_pct,
        route: result.route,
    }))
}
