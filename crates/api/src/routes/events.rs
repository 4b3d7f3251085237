//! Event Routes

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::{ApiError, AppState};
use alerting::AlertResult;

/// Evaluate one event: `POST /event`
///
/// The body is decoded regardless of its declared content type.
pub async fn post_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AlertResult>, ApiError> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        debug!("Rejected undecodable body: {}", e);
        ApiError::InvalidJson(e.to_string())
    })?;

    let event = state
        .validator
        .validate(&payload)
        .map_err(ApiError::Validation)?;

    let result = state.service.handle(&event)?;
    Ok(Json(result))
}
