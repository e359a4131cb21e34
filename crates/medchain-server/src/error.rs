use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use medchain_ledger::{AppendError, LedgerError, ValidationError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("append rejected: {0}")]
    Append(#[from] AppendError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Append(AppendError::Validation(v)) => match v {
                ValidationError::LinkageMismatch { .. } | ValidationError::PositionGap { .. } => {
                    StatusCode::CONFLICT
                }
                ValidationError::PositionExhausted { .. } => StatusCode::CONFLICT,
                ValidationError::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
                ValidationError::SerializationFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ValidationError::HashMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Append(AppendError::Poisoned(_))
            | Self::Ledger(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Append(e) if e.is_retryable())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        let body = json!({
            "error": self.to_string(),
            "retryable": self.retryable(),
        });
        (status, Json(body)).into_response()
    }
}
