//! Mapping of domain failures to HTTP responses

use alert_service::ServiceError;
use alerting::AlertError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use data_validator::ValidationError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors returned by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not valid JSON
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    /// Payload decoded but failed field validation
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),

    /// Rule engine rejected the event or failed
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::InvalidJson(_) => (StatusCode::BAD_REQUEST, json!({"error": "invalid_json"})),
            ApiError::Validation(errors) => {
                let details: Vec<_> = errors
                    .iter()
                    .map(|e| json!({"field": e.field(), "message": e.to_string()}))
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    json!({"error": "validation_error", "details": details}),
                )
            }
            ApiError::Service(ServiceError::Rule(
                err @ AlertError::NonMonotonicTime { user_id, last_t, new_t },
            )) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "non_monotonic_time",
                    "details": {
                        "user_id": user_id,
                        "last_t": last_t,
                        "new_t": new_t,
                        "message": err.to_string(),
                    },
                }),
            ),
            ApiError::Service(ServiceError::Rule(
                err @ AlertError::AmountOverflow { user_id, t },
            )) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "amount_overflow",
                    "details": {
                        "user_id": user_id,
                        "t": t,
                        "message": err.to_string(),
                    },
                }),
            ),
            ApiError::Service(ServiceError::Storage(err)) => {
                error!("State store failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "internal_error"}),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
