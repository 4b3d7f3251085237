//! Midnight Alerts API Server
//!
//! HTTP boundary for the rule engine: decodes events, validates them, and
//! maps domain failures to JSON error responses.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

mod config;
mod error;
mod routes;

pub use self::config::ServerConfig;
pub use error::ApiError;

use alert_service::AlertService;
use alerting::RuleSettings;
use data_validator::Validator;

/// Application state shared across handlers
pub struct AppState {
    /// Rule engine entry point
    pub service: AlertService,
    /// Payload validator
    pub validator: Validator,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
    /// Prometheus handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: RuleSettings) -> Self {
        Self {
            service: AlertService::new(settings),
            validator: Validator::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    /// Absent when the state store is unavailable
    pub users_tracked: Option<usize>,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/event", post(routes::events::post_event))
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/settings", get(routes::settings::get_settings))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
///
/// Reports `degraded` with 503 when the state store cannot be locked.
async fn health_handler(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let (code, status, users_tracked) = match state.service.store().user_count() {
        Ok(count) => (StatusCode::OK, "healthy", Some(count)),
        Err(e) => {
            warn!("Health check found state store unavailable: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", None)
        }
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            timestamp,
            version: state.version.clone(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
            users_tracked,
        }),
    )
}

/// Prometheus scrape handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Initialize logging
pub fn init_logging(config: &ServerConfig) -> anyhow::Result<()> {
    let level = config.max_level()?;

    if config.log_json {
        let subscriber = FmtSubscriber::builder()
            .json()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

/// Run the server until Ctrl-C
pub async fn run_server(config: ServerConfig, settings: RuleSettings) -> anyhow::Result<()> {
    let mut state = AppState::new(settings);
    if config.metrics_enabled {
        let handle = PrometheusBuilder::new().install_recorder()?;
        AlertService::describe_metrics();
        state = state.with_metrics(handle);
    }
    let app = create_router(Arc::new(state));

    info!("Starting API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(Arc::new(AppState::new(RuleSettings::default())))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn post_event(app: &Router, body: Value) -> (StatusCode, Value) {
        send(app, "POST", "/event", &body.to_string()).await
    }

    #[tokio::test]
    async fn test_event_without_alert() {
        let app = app();
        let (status, body) =
            post_event(&app, json!({"type": "deposit", "amount": "10", "user_id": 1, "t": 1})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"alert": false, "alert_codes": [], "user_id": 1}));
    }

    #[tokio::test]
    async fn test_large_withdraw_alerts() {
        let app = app();
        let (status, body) =
            post_event(&app, json!({"type": "withdraw", "amount": 150, "user_id": 5, "t": 1})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"alert": true, "alert_codes": [1100], "user_id": 5}));
    }

    #[tokio::test]
    async fn test_deposit_window_over_http() {
        let app = app();
        post_event(&app, json!({"type": "deposit", "amount": 100, "user_id": 2, "t": 1})).await;
        let (_, body) =
            post_event(&app, json!({"type": "deposit", "amount": 150, "user_id": 2, "t": 5})).await;

        assert_eq!(body["alert_codes"], json!([123]));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let app = app();
        let (status, body) = send(&app, "POST", "/event", "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "invalid_json"}));
    }

    #[tokio::test]
    async fn test_validation_error() {
        let app = app();
        let (status, body) =
            post_event(&app, json!({"type": "refund", "amount": -5, "user_id": 1})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        let fields: Vec<_> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["type", "amount", "t"]);
    }

    #[tokio::test]
    async fn test_non_monotonic_time() {
        let app = app();
        post_event(&app, json!({"type": "deposit", "amount": 1, "user_id": 3, "t": 10})).await;
        let (status, body) =
            post_event(&app, json!({"type": "deposit", "amount": 1, "user_id": 3, "t": 10})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "non_monotonic_time");
        assert_eq!(body["details"]["user_id"], 3);
        assert_eq!(body["details"]["last_t"], 10);
        assert_eq!(body["details"]["new_t"], 10);
        assert_eq!(
            body["details"]["message"],
            "non-monotonic time: last_t=10, new_t=10, user_id=3"
        );
    }

    #[tokio::test]
    async fn test_health_counts_users() {
        let app = app();
        post_event(&app, json!({"type": "deposit", "amount": 1, "user_id": 1, "t": 1})).await;
        post_event(&app, json!({"type": "deposit", "amount": 1, "user_id": 2, "t": 1})).await;

        let (status, body) = send(&app, "GET", "/api/v1/health", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["users_tracked"], 2);
    }

    #[tokio::test]
    async fn test_health_degraded_when_store_poisoned() {
        let state = Arc::new(AppState::new(RuleSettings::default()));
        let app = create_router(Arc::clone(&state));

        let poisoner = Arc::clone(&state);
        let joined = std::thread::spawn(move || {
            let _guard = poisoner.service.store().lock().unwrap();
            panic!("panic while holding the store lock");
        })
        .join();
        assert!(joined.is_err());

        let (status, body) = send(&app, "GET", "/api/v1/health", "").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["users_tracked"], Value::Null);

        let (status, body) =
            post_event(&app, json!({"type": "deposit", "amount": 1, "user_id": 1, "t": 1})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "internal_error"}));
    }

    #[tokio::test]
    async fn test_deposit_overflow_is_a_client_error() {
        let app = app();
        let max = "79228162514264337593543950335";
        let (status, _) = post_event(
            &app,
            json!({"type": "deposit", "amount": max, "user_id": 4, "t": 1}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = post_event(
            &app,
            json!({"type": "deposit", "amount": max, "user_id": 4, "t": 2}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "amount_overflow");
        assert_eq!(body["details"]["user_id"], 4);
        assert_eq!(body["details"]["t"], 2);

        // Other users are unaffected
        let (status, _) =
            post_event(&app, json!({"type": "deposit", "amount": 1, "user_id": 5, "t": 1})).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&app, "GET", "/api/v1/health", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_amount_precision_survives_decoding() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/event",
            r#"{"type": "withdraw", "amount": 100.000000000000001, "user_id": 6, "t": 1}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"alert": true, "alert_codes": [1100], "user_id": 6}));
    }

    #[tokio::test]
    async fn test_settings_endpoint() {
        let app = app();
        let (status, body) = send(&app, "GET", "/api/v1/settings", "").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["alert_code_withdraw_gt"], 1100);
        assert_eq!(body["rule_inc_deposits_count"], 3);
    }

    #[tokio::test]
    async fn test_metrics_disabled() {
        let app = app();
        let (status, _) = send(&app, "GET", "/metrics", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
