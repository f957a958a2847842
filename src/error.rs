// =============================================================================
// Error types
// =============================================================================
//
// `AnalysisError` is the per-ticker taxonomy: every variant ends up as a
// `{ ticker, error }` record and never aborts a batch. Insufficient history
// and degenerate ratios are not errors at all; they surface as undefined
// indicator values.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Provider returned no bars.
    #[error("No data found for {0}")]
    NoData(String),

    /// Bars violate the input contract (ordering, non-finite prices).
    #[error("Invalid price history for {ticker}: {reason}")]
    InvalidBars { ticker: String, reason: String },

    /// Provider call failed.
    #[error("{0:#}")]
    Fetch(#[from] anyhow::Error),
}

/// Caller-facing HTTP errors.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
