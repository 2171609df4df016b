//! Integration tests for the permission consent flow.
//!
//! Tests cover:
//! - Repeated requests launch the consent UI each time
//! - Out-of-band delivery of consent results
//! - Refused scopes, dismissed dialogs and launch failures
//! - Rejection of results for unknown requests

use api::AppState;
use axum::http::StatusCode;
use axum::Router;
use serde_json::{json, Value};
use shared::models::MetricType;
use shared::provider::FixtureProvider;
use std::sync::Arc;
use std::time::Duration;

use super::common::{app_with, bridge, get, post_json};

/// Polls until a permission request is outstanding and returns its token.
async fn wait_for_pending(app: &Router) -> Value {
    for _ in 0..200 {
        let (status, response) = get(app.clone(), &bridge("pendingPermission")).await;
        assert_eq!(status, StatusCode::OK);
        if !response["token"].is_null() {
            return response["token"].clone();
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("no permission request became pending");
}

#[tokio::test]
async fn test_request_permissions_twice_launches_twice() {
    let provider = Arc::new(FixtureProvider::new());
    let app = api::create_router(AppState::with_provider(provider.clone()));

    for _ in 0..2 {
        let (status, response) =
            post_json(app.clone(), &bridge("requestPermissions"), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["granted"], true);
        assert!(response["denied"].as_array().unwrap().is_empty());
    }

    let launched = provider.launched_requests();
    assert_eq!(launched.len(), 2);
    assert_ne!(launched[0].token, launched[1].token);
    assert_eq!(launched[0].scopes.len(), MetricType::ALL.len());
}

#[tokio::test]
async fn test_check_permissions_reflects_grants() {
    let (app, _state) = app_with(FixtureProvider::new().with_granted([MetricType::Steps.scope()]));

    let (status, response) = post_json(app, &bridge("checkPermissions"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["granted"], false);

    let denied = response["denied"].as_array().unwrap();
    assert_eq!(denied.len(), MetricType::ALL.len() - 1);
    assert!(!denied.contains(&json!("read:steps")));
}

#[tokio::test]
async fn test_refused_scope_is_reported() {
    let (app, _state) = app_with(FixtureProvider::new().refusing(MetricType::Sleep.scope()));

    let (_, response) = post_json(app, &bridge("requestPermissions"), json!({})).await;
    assert_eq!(response["granted"], false);
    assert_eq!(response["denied"], json!(["read:sleep"]));
}

#[tokio::test]
async fn test_launch_failure_resolves_not_granted() {
    let (app, _state) = app_with(FixtureProvider::new().with_launch_failure("ActivityNotFoundException"));

    let (status, response) = post_json(app, &bridge("requestPermissions"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["granted"], false);
    assert_eq!(
        response["denied"].as_array().unwrap().len(),
        MetricType::ALL.len()
    );
}

#[tokio::test]
async fn test_out_of_band_consent_result() {
    let (app, _state) = app_with(FixtureProvider::new().with_manual_consent());

    let request = tokio::spawn({
        let app = app.clone();
        let uri = bridge("requestPermissions");
        async move { post_json(app, &uri, json!({})).await }
    });

    let token = wait_for_pending(&app).await;
    let granted: Vec<String> = MetricType::ALL
        .iter()
        .map(|m| m.scope().to_string())
        .collect();

    let (status, response) = post_json(
        app.clone(),
        &bridge("permissionResult"),
        json!({"token": token, "granted": granted}),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(response["accepted"], true);

    let (status, response) = request.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["granted"], true);

    let (_, pending) = get(app, &bridge("pendingPermission")).await;
    assert!(pending["token"].is_null());
}

#[tokio::test]
async fn test_dismissed_dialog_resolves_not_granted() {
    let (app, _state) = app_with(FixtureProvider::new().with_manual_consent());

    let request = tokio::spawn({
        let app = app.clone();
        let uri = bridge("requestPermissions");
        async move { post_json(app, &uri, json!({})).await }
    });

    let token = wait_for_pending(&app).await;
    let (status, _) = post_json(app, &bridge("permissionResult"), json!({"token": token})).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (_, response) = request.await.unwrap();
    assert_eq!(response["granted"], false);
    assert_eq!(
        response["denied"].as_array().unwrap().len(),
        MetricType::ALL.len()
    );
}

#[tokio::test]
async fn test_result_for_wrong_token_is_rejected() {
    let (app, _state) = app_with(FixtureProvider::new().with_manual_consent());

    let request = tokio::spawn({
        let app = app.clone();
        let uri = bridge("requestPermissions");
        async move { post_json(app, &uri, json!({})).await }
    });

    let token = wait_for_pending(&app).await;
    let wrong = token.as_u64().unwrap() + 100;

    let (status, response) = post_json(
        app.clone(),
        &bridge("permissionResult"),
        json!({"token": wrong, "granted": ["read:steps"]}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["error"], "UNKNOWN_TOKEN");

    // The outstanding request is unaffected and can still be answered
    let (status, _) = post_json(
        app,
        &bridge("permissionResult"),
        json!({"token": token, "granted": ["read:steps"]}),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (_, response) = request.await.unwrap();
    assert_eq!(response["granted"], false);
    assert!(!response["denied"]
        .as_array()
        .unwrap()
        .contains(&json!("read:steps")));
}
