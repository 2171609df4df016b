//! Liveness endpoint.
//!
//! Reports that the bridge is up, which provider it serves and whether a
//! consent flow is waiting on the host. It never touches the provider itself,
//! so it stays cheap for load balancers; use `isAvailable` for SDK status.

use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

/// Liveness response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always "healthy" if reachable.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Name of the health provider behind the bridge.
    pub provider: &'static str,
    /// Whether a permission request is waiting for its consent result.
    pub consent_pending: bool,
}

/// Creates the liveness routes.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let service = state.service();
    Json(HealthResponse {
        status: "healthy",
        service: "healthbridge-api",
        version: env!("CARGO_PKG_VERSION"),
        provider: service.provider_name(),
        consent_pending: service.gate().pending_token().is_some(),
    })
}
