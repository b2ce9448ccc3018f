//! # error
//!
//! Centralised application error types.
//!
//! `TradeError` is the domain-level error produced by the settlement engine
//! and the ledger — it is `PartialEq` so tests can assert on exact variants.
//! `AppError` is the HTTP-level error; every handler returns
//! `Result<_, AppError>` and Axum's `IntoResponse` impl converts it into a
//! structured JSON body so the frontend always gets a machine-readable
//! response even on failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Domain errors raised by the ledger and the settlement engine.
#[derive(Debug, Error, PartialEq)]
pub enum TradeError {
    /// Stake / transfer amount is NaN, infinite, zero or negative.
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// The account cannot cover the requested debit.
    #[error("Insufficient balance: requested ${requested:.2}, available ${available:.2}")]
    InsufficientBalance { requested: f64, available: f64 },

    /// The position was already settled — settlement happens exactly once.
    #[error("Position {0} is already settled")]
    PositionAlreadySettled(Uuid),

    /// Expiry settlement attempted before the position's duration elapsed.
    #[error("Position {0} has not expired yet")]
    PositionNotExpired(Uuid),

    /// Double-stake is only allowed inside the final window before expiry.
    #[error("Double-stake window closed (allowed only in the last {0}s before expiry)")]
    DoubleWindowClosed(u64),
}

#[derive(Debug, Error)]
pub enum AppError {
    /// The request payload was syntactically correct but semantically invalid.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The requested resource (e.g. a session or position) does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request conflicts with current state (duplicate username,
    /// already-settled position, ...).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Catch-all for unexpected failures.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<TradeError> for AppError {
    fn from(err: TradeError) -> Self {
        match err {
            TradeError::PositionAlreadySettled(_) => AppError::Conflict(err.to_string()),
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {err}"),
            ),
        };

        let body = Json(json!({
            "ok":    false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_settled_maps_to_conflict() {
        let app: AppError = TradeError::PositionAlreadySettled(Uuid::new_v4()).into();
        assert!(matches!(app, AppError::Conflict(_)));
    }

    #[test]
    fn test_balance_errors_map_to_bad_request() {
        let app: AppError = TradeError::InsufficientBalance {
            requested: 500.0,
            available: 100.0,
        }
        .into();
        assert!(matches!(app, AppError::BadRequest(_)));

        let app: AppError = TradeError::InvalidAmount(f64::NAN).into();
        assert!(matches!(app, AppError::BadRequest(_)));
    }
}
