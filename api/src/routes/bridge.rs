//! Plugin bridge endpoints.
//!
//! The host invokes plugin methods by name, e.g.
//! `POST /bridge/HealthConnect/readHeartRate` with
//! `{"startDate": "...", "endDate": "..."}`. Consent results observed by the
//! host are delivered to `POST /bridge/HealthConnect/permissionResult`.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::health::{ErrorCode, HealthError, ReadRequest, SamplesRequest};
use shared::models::{MetricType, PermissionScope};
use shared::provider::{ConsentResult, CorrelationToken, GateError};
use thiserror::Error;

/// Name the plugin is registered under.
pub const PLUGIN_NAME: &str = "HealthConnect";

/// Error response.
#[derive(Debug, Serialize, Error)]
#[error("{error}: {message}")]
pub struct BridgeError {
    /// Stable error code.
    pub error: ErrorCode,
    /// Human-readable message.
    pub message: String,
    #[serde(skip)]
    status: StatusCode,
}

impl BridgeError {
    fn new(status: StatusCode, error: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
            status,
        }
    }
}

impl From<HealthError> for BridgeError {
    fn from(err: HealthError) -> Self {
        let status = match err.code() {
            ErrorCode::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorCode::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::ProviderError => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.code(), err.to_string())
    }
}

impl From<GateError> for BridgeError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::UnknownToken { .. } => {
                Self::new(StatusCode::CONFLICT, ErrorCode::UnknownToken, err.to_string())
            }
            GateError::LockError => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::ProviderError,
                err.to_string(),
            ),
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Consent result delivered by the host.
#[derive(Debug, Deserialize)]
pub struct PermissionResultRequest {
    /// Token of the request being answered.
    pub token: CorrelationToken,
    /// Granted scopes; absent when the dialog was dismissed.
    #[serde(default)]
    pub granted: Option<Vec<PermissionScope>>,
}

/// Acknowledgement of a delivered consent result.
#[derive(Debug, Serialize, Deserialize)]
pub struct PermissionResultResponse {
    /// Always true; failures are reported as errors.
    pub accepted: bool,
}

/// Outstanding permission request, if any.
#[derive(Debug, Serialize, Deserialize)]
pub struct PendingPermissionResponse {
    /// Token the host must answer with.
    pub token: Option<CorrelationToken>,
}

/// Returns the route path of a plugin method.
fn bridge_path(method: &str) -> String {
    format!("/bridge/{PLUGIN_NAME}/{method}")
}

/// Creates the bridge routes.
pub fn bridge_routes(state: AppState) -> Router {
    Router::new()
        .route(&bridge_path("permissionResult"), post(permission_result))
        .route(&bridge_path("pendingPermission"), get(pending_permission))
        .route(&bridge_path("{method}"), post(invoke))
        .with_state(state)
}

async fn invoke(
    State(state): State<AppState>,
    Path(method): Path<String>,
    body: Bytes,
) -> Result<Response, BridgeError> {
    let service = state.service();

    tracing::debug!(plugin = PLUGIN_NAME, %method, "Bridge call");

    let response = match method.as_str() {
        "isAvailable" => Json(service.is_available()).into_response(),
        "requestPermissions" => Json(service.request_permissions().await).into_response(),
        "checkPermissions" => Json(service.check_permissions()).into_response(),
        "readSamples" => {
            let request: SamplesRequest = parse_body(&body)?;
            Json(service.read_samples(&request)?).into_response()
        }
        other => {
            let Some(metric) = MetricType::from_bridge_method(other) else {
                return Err(BridgeError::new(
                    StatusCode::NOT_FOUND,
                    ErrorCode::Unimplemented,
                    format!("{PLUGIN_NAME}.{other} is not implemented"),
                ));
            };
            let request: ReadRequest = parse_body(&body)?;
            let response = service
                .read(metric, &request)
                .inspect_err(|e| tracing::warn!(%method, error = %e, "Bridge read failed"))?;
            Json(response).into_response()
        }
    };

    Ok(response)
}

async fn permission_result(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<PermissionResultResponse>), BridgeError> {
    let request: PermissionResultRequest = parse_body(&body)?;
    let result = match request.granted {
        Some(granted) => ConsentResult::Completed { granted },
        None => ConsentResult::Cancelled,
    };

    state.service().deliver_consent(request.token, result)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(PermissionResultResponse { accepted: true }),
    ))
}

async fn pending_permission(State(state): State<AppState>) -> Json<PendingPermissionResponse> {
    Json(PendingPermissionResponse {
        token: state.service().gate().pending_token(),
    })
}

/// Parses a JSON body; an empty body reads as `{}`.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, BridgeError> {
    let bytes: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body.as_ref()
    };
    serde_json::from_slice(bytes).map_err(|e| {
        BridgeError::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidRequest,
            format!("Invalid JSON body: {e}"),
        )
    })
}
