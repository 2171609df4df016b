//! Integration tests for health check and availability.
//!
//! Tests cover:
//! - Health check endpoint
//! - Provider availability reporting

use axum::http::StatusCode;
use serde_json::json;
use shared::provider::{FixtureProvider, SdkStatus};

use super::common::{app_with, bridge, get, post_json, test_app};

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "healthbridge-api");
    assert_eq!(response["provider"], "fixture");
    assert_eq!(response["consentPending"], false);
}

#[tokio::test]
async fn test_is_available() {
    let (app, _state) = test_app();

    let (status, response) = post_json(app, &bridge("isAvailable"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["available"], true);
    assert_eq!(response["status"], "available");
}

#[tokio::test]
async fn test_update_required_is_not_available() {
    let (app, _state) = app_with(FixtureProvider::new().with_status(SdkStatus::UpdateRequired));

    let (status, response) = post_json(app, &bridge("isAvailable"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["available"], false);
    assert_eq!(response["status"], "updateRequired");
}

#[tokio::test]
async fn test_status_failure_reports_unavailable() {
    let (app, _state) = app_with(FixtureProvider::new().with_status_failure("SecurityException"));

    let (status, response) = post_json(app, &bridge("isAvailable"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["available"], false);
}
