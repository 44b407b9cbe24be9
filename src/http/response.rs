//! Error responses.
//!
//! Failures are returned as `{"error": "<kind>", "message": "<text>"}` with
//! a status derived from the error kind. No result body is ever produced for
//! a failed run.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::BenchError;

/// Kind reported when the run task itself died.
pub const INTERNAL_ERROR_KIND: &str = "internal_error";

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Error returned by HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    Bench(BenchError),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Bench(e) => status_for(e),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Bench(e) => ErrorBody {
                error: e.kind().to_string(),
                message: e.to_string(),
            },
            ApiError::Internal(message) => ErrorBody {
                error: INTERNAL_ERROR_KIND.to_string(),
                message: message.clone(),
            },
        }
    }
}

/// HTTP status for a benchmark failure.
pub fn status_for(error: &BenchError) -> StatusCode {
    match error {
        BenchError::InvalidConfiguration(_) => StatusCode::BAD_REQUEST,
        BenchError::InsufficientFunds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        BenchError::Connectivity(_) | BenchError::Submission(_) => StatusCode::BAD_GATEWAY,
        BenchError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        BenchError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl From<BenchError> for ApiError {
    fn from(e: BenchError) -> Self {
        ApiError::Bench(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (BenchError::InvalidConfiguration("x".into()), StatusCode::BAD_REQUEST),
            (
                BenchError::InsufficientFunds {
                    balance: U256::ZERO,
                    required: U256::from(1),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (BenchError::Connectivity("x".into()), StatusCode::BAD_GATEWAY),
            (BenchError::Submission("x".into()), StatusCode::BAD_GATEWAY),
            (
                BenchError::Timeout {
                    stage: "inclusion",
                    after: Duration::from_secs(1),
                },
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (BenchError::Cancelled, StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (error, status) in cases {
            assert_eq!(status_for(&error), status, "{}", error.kind());
        }
    }

    #[test]
    fn test_body_carries_kind() {
        let body = ApiError::from(BenchError::Cancelled).body();
        assert_eq!(body.error, "cancelled_error");

        let body = ApiError::Internal("task panicked".into()).body();
        assert_eq!(body.error, INTERNAL_ERROR_KIND);
        assert_eq!(body.message, "task panicked");
    }
}
