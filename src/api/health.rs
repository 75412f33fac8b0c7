//! Health check endpoint

use axum::{Router, http::StatusCode, routing::get};
use serde::Serialize;

use super::process::Utf8Json;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness probe - is the service running?
async fn health() -> Utf8Json<HealthResponse> {
    Utf8Json(
        StatusCode::OK,
        HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

/// Build health router
#[must_use]
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}
