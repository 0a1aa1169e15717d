//! HTTP request handlers
//!
//! Contains handlers for all HTTP endpoints.

use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use tracing::{debug, instrument};

use super::AppState;
use crate::exposition::CONTENT_TYPE;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Health status
    status: String,
    /// Application version
    version: String,
}

/// Root endpoint - displays basic info
pub async fn root(State(state): State<AppState>) -> Html<String> {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>HBase Exporter</title>
</head>
<body>
    <h1>HBase Exporter</h1>
    <p>Version: {}</p>
    <p>Target: {}</p>
    <ul>
        <li><a href="/health">Health Check</a></li>
        <li><a href="{}">Metrics</a></li>
    </ul>
</body>
</html>"#,
        env!("CARGO_PKG_VERSION"),
        state.config.hbase.target_url(),
        state.config.server.path
    );
    Html(html)
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Metrics endpoint - runs one cycle of every collector and returns
/// Prometheus text format
#[instrument(skip(state), name = "metrics_handler")]
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    // Child token: a shutdown aborts in-flight fetches
    let cancel = state.shutdown.child_token();
    let samples = state.registry.gather(&cancel).await;
    let output = state.formatter.format(&samples);

    debug!(
        duration_ms = start.elapsed().as_millis() as u64,
        samples = samples.len(),
        "Metrics collection complete"
    );

    (StatusCode::OK, [(axum::http::header::CONTENT_TYPE, CONTENT_TYPE)], output)
}
