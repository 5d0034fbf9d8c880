pub mod aliases;
pub mod error;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{Result, SolverError};
use state::AppState;

/// Builds the façade's route table. Every handler reaches
/// chain state through `AppState`; there is no handler-local mutable
/// state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/pools", get(handlers::pools::pools))
        .route("/quote", post(handlers::quote::quote))
        .route("/orderbook", post(handlers::orderbook::orderbook))
        .route("/price", post(handlers::price::price))
        .route("/intent", post(handlers::intent::intent))
        .route("/intents/open", post(handlers::intents::open_intents))
        .route("/intents/history", post(handlers::intents::history))
        .route("/intent/build/create", post(handlers::build::build_create))
        .route("/intent/build/execute", post(handlers::build::build_execute))
        .route("/intent/build/cancel", post(handlers::build::build_cancel))
        .route("/intent/create", post(handlers::mutations::create_intent))
        .route("/intent/execute", post(handlers::mutations::execute_intent))
        .route("/intent/cancel", post(handlers::mutations::cancel_intent))
        .route("/tx/execute", post(handlers::tx::execute_tx))
        .route("/wallet/balance", post(handlers::wallet::balance))
        .route("/config", post(handlers::config::protocol_config))
        .route("/solver/metrics", get(handlers::metrics::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn serve(host: &str, port: u16, state: Arc<AppState>) -> Result<()> {
    let app = router(state);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| SolverError::Fatal(format!("binding to {addr}: {e}")))?;

    info!("HTTP façade listening on {addr}");
    axum::serve(listener, app)
        .await
        .map_err(|e| SolverError::Fatal(format!("HTTP server error: {e}")))?;

    Ok(())
}
