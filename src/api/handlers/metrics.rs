use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::engine::MetricsSnapshot;

#[derive(Serialize)]
pub struct MetricsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub snapshot: MetricsSnapshot,
    pub intents_in_flight: usize,
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        success: true,
        snapshot: state.metrics.snapshot(),
        intents_in_flight: state.pipeline.processing_set().len(),
    })
}
