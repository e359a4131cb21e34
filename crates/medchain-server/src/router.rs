use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all medchain endpoints.
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handler::chain_handler))
        .route("/tail", get(handler::tail_handler))
        .route("/transaction", post(handler::transaction_handler))
        .route("/wallet", post(handler::wallet_handler))
        .route("/health", get(handler::health_handler))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
