//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including test app setup and HTTP request helpers.

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use shared::provider::FixtureProvider;
use std::sync::Arc;

/// Day-long window used by most read tests.
pub const START: &str = "2024-01-01T00:00:00Z";
/// End of the day-long window.
pub const END: &str = "2024-01-02T00:00:00Z";

/// Fixture with one or more records of every family.
pub const FIXTURE: &str = r#"{
    "status": "available",
    "records": [
        {"recordType": "steps", "start": "2024-01-01T08:00:00Z", "end": "2024-01-01T09:00:00Z", "count": 1200},
        {"recordType": "steps", "start": "2024-01-01T12:00:00Z", "end": "2024-01-01T13:00:00Z", "count": 800},
        {"recordType": "heartRate", "start": "2024-01-01T10:00:00Z", "end": "2024-01-01T10:05:00Z", "samples": [
            {"time": "2024-01-01T10:00:00Z", "beatsPerMinute": 72},
            {"time": "2024-01-01T10:01:00Z", "beatsPerMinute": 75},
            {"time": "2024-01-01T10:02:00Z", "beatsPerMinute": 78}
        ]},
        {"recordType": "heartRate", "start": "2024-01-01T11:00:00Z", "end": "2024-01-01T11:01:00Z", "samples": [
            {"time": "2024-01-01T11:00:00Z", "beatsPerMinute": 90}
        ]},
        {"recordType": "restingHeartRate", "time": "2024-01-01T06:00:00Z", "beatsPerMinute": 54},
        {"recordType": "heartRateVariabilityRmssd", "time": "2024-01-01T06:05:00Z", "heartRateVariabilityMillis": 42.5},
        {"recordType": "oxygenSaturation", "time": "2024-01-01T06:10:00Z", "percentage": 97.0},
        {"recordType": "sleepSession", "start": "2024-01-01T00:30:00Z", "end": "2024-01-01T02:00:00Z", "stage": "deep"},
        {"recordType": "sleepSession", "start": "2024-01-01T02:00:00Z", "end": "2024-01-01T02:20:00Z", "stage": "awake"},
        {"recordType": "steps", "start": "2024-01-03T08:00:00Z", "end": "2024-01-03T09:00:00Z", "count": 5000}
    ]
}"#;

/// Creates a test router over `provider`.
///
/// # Returns
///
/// A tuple containing the configured router and the app state.
pub fn app_with(provider: FixtureProvider) -> (Router, AppState) {
    let state = AppState::with_provider(Arc::new(provider));
    let router = create_router(state.clone());
    (router, state)
}

/// Creates a test router serving [`FIXTURE`].
pub fn test_app() -> (Router, AppState) {
    app_with(FixtureProvider::from_json_str(FIXTURE).unwrap())
}

/// Returns the bridge URI for `method`.
pub fn bridge(method: &str) -> String {
    format!("/bridge/{}/{method}", api::PLUGIN_NAME)
}

/// Helper to make a POST request with JSON body.
///
/// # Arguments
///
/// * `app` - The Axum router to send the request to
/// * `uri` - The URI path to POST to
/// * `body` - The JSON body to send
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a GET request.
///
/// # Arguments
///
/// * `app` - The Axum router to send the request to
/// * `uri` - The URI path to GET from
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}
