//! Error handling utilities for API responses.
//!
//! Provides the single translation point between service-layer errors and
//! HTTP responses. No lower-level error ever reaches a client raw: every
//! failure becomes a `{ "message": ... }` body with a status drawn from
//! {400, 401, 404, 409, 500}, and 5xx causes are logged here.

use crate::errors::ServiceError;
use axum::Json;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Error envelope for failed requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Converts a ServiceError to its HTTP response.
pub fn service_error_to_http(error: ServiceError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = match error {
        ServiceError::Validation { message } => (StatusCode::BAD_REQUEST, message),
        ServiceError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message),
        ServiceError::NotFound { message } => (StatusCode::NOT_FOUND, message),
        ServiceError::AlreadyExists { message } => (StatusCode::CONFLICT, message),
        ServiceError::Database { source } => {
            tracing::error!("Database error: {}", source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
        ServiceError::Internal { message } => {
            tracing::error!("Internal error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };

    (status, Json(ErrorResponse { message }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let cases = [
            (ServiceError::validation("v"), StatusCode::BAD_REQUEST),
            (ServiceError::unauthorized("u"), StatusCode::UNAUTHORIZED),
            (ServiceError::not_found("n"), StatusCode::NOT_FOUND),
            (ServiceError::already_exists("a"), StatusCode::CONFLICT),
            (
                ServiceError::internal("i"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            let (status, _) = service_error_to_http(error);
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn internal_causes_are_not_leaked_to_the_client() {
        let (_, Json(body)) =
            service_error_to_http(ServiceError::Database {
                source: anyhow::anyhow!("connection refused on 10.0.0.3"),
            });
        assert_eq!(body.message, "Internal server error");
    }
}
