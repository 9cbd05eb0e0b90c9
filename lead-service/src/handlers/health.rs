use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::services::{diagnose, get_metrics, DiagnosticReport};
use crate::startup::AppState;

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Hello from the lead intake backend!" }))
}

pub async fn hello() -> impl IntoResponse {
    Json(json!({ "message": "Hello from the backend API!" }))
}

/// Liveness: answers whenever the process is serving.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "lead-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness: the store must be configured and answer a ping.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.as_deref() {
        Some(store) => match store.health_check().await {
            Ok(_) => StatusCode::OK,
            Err(_) => StatusCode::SERVICE_UNAVAILABLE,
        },
        None => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticReport> {
    Json(diagnose(state.store.as_deref(), &state.config.mongodb).await)
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
