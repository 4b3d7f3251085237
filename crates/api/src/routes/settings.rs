//! Settings Routes

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::AppState;
use alerting::RuleSettings;

/// Active rule settings: `GET /api/v1/settings`
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<RuleSettings> {
    Json(state.service.settings().as_ref().clone())
}
