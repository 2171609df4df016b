//! Integration tests for the metric read methods.
//!
//! Tests cover:
//! - Normalized reads for every metric
//! - Heart-rate fan-out and sleep stage mapping
//! - Request validation before any provider call
//! - Error codes for provider failures

use api::AppState;
use axum::http::StatusCode;
use serde_json::{json, Value};
use shared::health::HealthService;
use shared::models::RecordKind;
use shared::provider::{FixtureProvider, ProviderError};
use std::sync::Arc;

use super::common::{app_with, bridge, post_json, test_app, END, FIXTURE, START};

fn day() -> Value {
    json!({"startDate": START, "endDate": END})
}

fn values(response: &Value) -> Vec<f64> {
    response["samples"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["value"].as_f64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_read_steps_in_provider_order() {
    let (app, _state) = test_app();

    let (status, response) = post_json(app, &bridge("readSteps"), day()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["type"], "steps");
    // The record on 2024-01-03 is outside the window
    assert_eq!(values(&response), vec![1200.0, 800.0]);
    assert_eq!(response["samples"][0]["startDate"], "2024-01-01T08:00:00Z");
    assert_eq!(response["samples"][0]["endDate"], "2024-01-01T09:00:00Z");
}

#[tokio::test]
async fn test_read_heart_rate_fans_out_points() {
    let (app, _state) = test_app();

    let (status, response) = post_json(app, &bridge("readHeartRate"), day()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["type"], "heartRate");
    assert_eq!(values(&response), vec![72.0, 75.0, 78.0, 90.0]);

    for sample in response["samples"].as_array().unwrap() {
        assert_eq!(sample["startDate"], sample["endDate"]);
    }
    assert_eq!(response["samples"][1]["startDate"], "2024-01-01T10:01:00Z");
}

#[tokio::test]
async fn test_read_instant_metrics() {
    let (app, _state) = test_app();

    let (_, resting) = post_json(app.clone(), &bridge("readRestingHeartRate"), day()).await;
    assert_eq!(resting["type"], "restingHeartRate");
    assert_eq!(values(&resting), vec![54.0]);

    let (_, hrv) = post_json(app.clone(), &bridge("readHRV"), day()).await;
    assert_eq!(hrv["type"], "hrv");
    assert_eq!(values(&hrv), vec![42.5]);
    assert_eq!(hrv["samples"][0]["startDate"], "2024-01-01T06:05:00Z");

    let (_, spo2) = post_json(app, &bridge("readSpO2"), day()).await;
    assert_eq!(spo2["type"], "spo2");
    assert_eq!(values(&spo2), vec![97.0]);
}

#[tokio::test]
async fn test_read_sleep_sessions() {
    let (app, _state) = test_app();

    let (status, response) = post_json(app, &bridge("readSleep"), day()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["type"], "sleep");
    assert_eq!(values(&response), vec![0.0, 0.0]);
    assert_eq!(response["samples"][0]["sleepState"], "deep");
    assert_eq!(response["samples"][0]["startDate"], "2024-01-01T00:30:00Z");
    assert_eq!(response["samples"][0]["endDate"], "2024-01-01T02:00:00Z");
    assert_eq!(response["samples"][1]["sleepState"], "awake");
}

#[tokio::test]
async fn test_read_samples_generic() {
    let (app, _state) = test_app();

    let (status, response) = post_json(
        app.clone(),
        &bridge("readSamples"),
        json!({"dataType": "heartRate", "startDate": START, "endDate": END}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["type"], "heartRate");
    assert_eq!(response["samples"].as_array().unwrap().len(), 4);

    let (status, response) = post_json(
        app.clone(),
        &bridge("readSamples"),
        json!({"dataType": "respiratoryRate", "startDate": START, "endDate": END}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "UNKNOWN_METRIC");

    let (status, response) = post_json(app, &bridge("readSamples"), day()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "MISSING_FIELD");
}

#[tokio::test]
async fn test_limit_caps_records() {
    let (app, _state) = test_app();

    let (status, response) = post_json(
        app.clone(),
        &bridge("readSteps"),
        json!({"startDate": START, "endDate": END, "limit": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(values(&response), vec![1200.0]);

    let (status, response) = post_json(
        app,
        &bridge("readSteps"),
        json!({"startDate": START, "endDate": END, "limit": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_malformed_dates_skip_provider() {
    let provider = Arc::new(FixtureProvider::from_json_str(FIXTURE).unwrap());
    let state = AppState::with_provider(provider.clone());
    let app = api::create_router(state);

    let (status, response) = post_json(
        app.clone(),
        &bridge("readSteps"),
        json!({"startDate": "last tuesday", "endDate": END}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "INVALID_RANGE");

    let (status, response) = post_json(
        app,
        &bridge("readSteps"),
        json!({"startDate": END, "endDate": START}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "INVALID_RANGE");

    assert_eq!(provider.read_calls(), 0);
}

#[tokio::test]
async fn test_empty_window_returns_no_samples() {
    let (app, _state) = test_app();

    let (status, response) = post_json(
        app,
        &bridge("readSteps"),
        json!({"startDate": START, "endDate": START}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(response["samples"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unsupported_family_reads_empty() {
    let provider = FixtureProvider::from_json_str(FIXTURE)
        .unwrap()
        .without_support(RecordKind::HeartRateVariabilityRmssd);
    let (app, _state) = app_with(provider);

    let (status, response) = post_json(app, &bridge("readHRV"), day()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["type"], "hrv");
    assert!(response["samples"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_provider_failure_passes_message_through() {
    let (app, _state) = app_with(
        FixtureProvider::new().with_read_failure(ProviderError::Failed(
            "RemoteException: quota exceeded".into(),
        )),
    );

    let (status, response) = post_json(app, &bridge("readSteps"), day()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response["error"], "PROVIDER_ERROR");
    assert_eq!(response["message"], "RemoteException: quota exceeded");
}

#[tokio::test]
async fn test_strict_permissions_deny_ungranted_reads() {
    let provider = Arc::new(FixtureProvider::from_json_str(FIXTURE).unwrap());
    let state = AppState::new(HealthService::new(provider).with_strict_permissions(true));
    let app = api::create_router(state);

    let (status, response) = post_json(app.clone(), &bridge("readSpO2"), day()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["error"], "PERMISSION_DENIED");

    let (status, response) = post_json(app.clone(), &bridge("requestPermissions"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["granted"], true);

    let (status, response) = post_json(app, &bridge("readSpO2"), day()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(values(&response), vec![97.0]);
}

#[tokio::test]
async fn test_unknown_method() {
    let (app, _state) = test_app();

    let (status, response) = post_json(app, &bridge("writeSteps"), day()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "UNIMPLEMENTED");
}
