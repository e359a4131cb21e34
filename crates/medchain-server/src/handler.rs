use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use medchain_ledger::MedicalLedger;
use medchain_types::{MedicalRecord, Transaction};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{ServerError, ServerResult};

/// Shared handler state: the one ledger built at startup.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<MedicalLedger>,
    /// Indent JSON response bodies.
    pub pretty_json: bool,
}

impl AppState {
    pub fn new(ledger: Arc<MedicalLedger>) -> Self {
        Self {
            ledger,
            pretty_json: false,
        }
    }

    pub fn with_pretty_json(mut self, pretty_json: bool) -> Self {
        self.pretty_json = pretty_json;
        self
    }

    fn render<T: Serialize>(&self, value: &T) -> ServerResult<Response> {
        if !self.pretty_json {
            return Ok(Json(value).into_response());
        }
        let body = serde_json::to_vec_pretty(value)
            .map_err(|e| ServerError::Internal(format!("cannot encode response: {e}")))?;
        Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Full chain, genesis first.
pub async fn chain_handler(State(state): State<AppState>) -> ServerResult<Response> {
    state.render(&state.ledger.snapshot()?)
}

/// The latest block.
pub async fn tail_handler(State(state): State<AppState>) -> ServerResult<Response> {
    state.render(&*state.ledger.tail()?)
}

/// Append one wallet update and return the block that records it.
pub async fn transaction_handler(
    State(state): State<AppState>,
    body: Result<Json<Transaction>, JsonRejection>,
) -> ServerResult<Response> {
    let Json(transaction) = body.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let block = state.ledger.append(transaction)?;
    tracing::info!(
        position = block.position(),
        wallet = %block.payload().wallet_address,
        "transaction recorded"
    );
    state.render(&*block)
}

/// Assign a wallet address to a new medical record.
pub async fn wallet_handler(
    State(state): State<AppState>,
    body: Result<Json<MedicalRecord>, JsonRejection>,
) -> ServerResult<Response> {
    let Json(record) = body.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    state.render(&record.with_derived_address())
}
