//! Error types for the guard server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Guard Error Enum ==
/// Unified error type for the cache, query layer, limiter and HTTP surface.
///
/// Cache misses and denied admissions are not errors in the primitives; they
/// are plain return values. `RateLimited` only exists for the HTTP layer.
#[derive(Error, Debug)]
pub enum GuardError {
    /// Rejected construction parameters (zero capacity, zero window, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Index outside the underlying array
    #[error("Index {index} out of bounds for array of length {len}")]
    OutOfBounds { index: usize, len: usize },

    /// Admission denied for an entity
    #[error("Rate limited: {entity}, retry after {retry_after_ms}ms")]
    RateLimited { entity: String, retry_after_ms: u64 },

    /// Range sum does not fit in an i64
    #[error("Sum of range [{left}, {right}] overflows i64")]
    Overflow { left: usize, right: usize },
}

// == IntoResponse Implementation ==
impl IntoResponse for GuardError {
    fn into_response(self) -> Response {
        let status = match &self {
            GuardError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GuardError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GuardError::OutOfBounds { .. } => StatusCode::BAD_REQUEST,
            GuardError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            GuardError::Overflow { .. } => StatusCode::BAD_REQUEST,
        };

        let body = match &self {
            GuardError::RateLimited { retry_after_ms, .. } => Json(json!({
                "error": self.to_string(),
                "retry_after_ms": retry_after_ms,
            })),
            _ => Json(json!({
                "error": self.to_string()
            })),
        };

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the guard crate.
pub type Result<T> = std::result::Result<T, GuardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let test_cases = vec![
            (
                GuardError::InvalidConfig("capacity".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                GuardError::InvalidRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                GuardError::OutOfBounds { index: 10, len: 5 },
                StatusCode::BAD_REQUEST,
            ),
            (
                GuardError::RateLimited {
                    entity: "alice".to_string(),
                    retry_after_ms: 250,
                },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                GuardError::Overflow { left: 0, right: 1 },
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_out_of_bounds_message() {
        let err = GuardError::OutOfBounds { index: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "Index 7 out of bounds for array of length 3"
        );
    }
}
