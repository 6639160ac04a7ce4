// =============================================================================
// API Error Taxonomy
// =============================================================================
//
// Validation failures (missing fields, short history, NaN indicators) are
// client-facing 400s with a message naming the offending field or indicator.
// Upstream and internal failures log full detail server-side and return a
// generic message — the caller never sees provider URLs or stack detail.
// =============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Application error types for the insight service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required top-level request field is absent.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Fetched price series is shorter than the minimum lookback.
    #[error("{0}")]
    InsufficientHistory(String),

    /// A named indicator resolved to missing/NaN/infinite after extraction.
    #[error("Indicator '{indicator}' missing or NaN{}", history_suffix(.history_rows))]
    InvalidIndicatorValue {
        indicator: String,
        history_rows: Option<usize>,
    },

    /// The market-data or news provider call failed or returned bad data.
    #[error("Upstream provider failure: {0}")]
    UpstreamFailure(String),

    /// Any other unexpected failure during computation, scaling, or scoring.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

fn history_suffix(rows: &Option<usize>) -> String {
    match rows {
        Some(n) => format!(". (history_rows={n})"),
        None => ".".to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MissingField(_)
            | ApiError::InsufficientHistory(_)
            | ApiError::InvalidIndicatorValue { .. } => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::UpstreamFailure(detail) => {
                error!(detail = %detail, "upstream provider failure");
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream data provider is unavailable".to_string(),
                )
            }
            ApiError::Internal(e) => {
                error!(error = ?e, "internal computation error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "detail": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
