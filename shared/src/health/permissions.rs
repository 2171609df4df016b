//! Permission gate.
//!
//! Requests every read scope as one batch through the provider's consent UI
//! and waits for the result to come back out-of-band. Requests are
//! serialized: a second caller waits until the first consent flow has
//! finished. Failures never propagate; they resolve as "not granted" with
//! the affected scopes listed in `denied`.

use crate::models::PermissionScope;
use crate::provider::{
    ConsentHandle, ConsentResult, CorrelationToken, GateError, HealthProvider, PermissionRequest,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{oneshot, Mutex};

/// Outcome of a permission request or check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionStatus {
    /// True only if every requested scope is granted.
    pub granted: bool,
    /// Scopes that are not granted.
    pub denied: Vec<PermissionScope>,
}

impl PermissionStatus {
    /// Builds a status from the requested and granted scope sets.
    #[must_use]
    pub fn from_grants(requested: &[PermissionScope], granted: &[PermissionScope]) -> Self {
        let denied: Vec<PermissionScope> = requested
            .iter()
            .copied()
            .filter(|scope| !granted.contains(scope))
            .collect();
        Self {
            granted: denied.is_empty(),
            denied,
        }
    }

    /// A status where nothing was granted.
    #[must_use]
    pub fn denied_all(requested: &[PermissionScope]) -> Self {
        Self {
            granted: false,
            denied: requested.to_vec(),
        }
    }
}

/// Serializes consent flows and correlates their results.
#[derive(Debug, Default)]
pub struct PermissionGate {
    consent: ConsentHandle,
    next_token: AtomicU64,
    in_flight: Mutex<()>,
}

impl PermissionGate {
    /// Creates a gate with no outstanding request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle results are delivered through.
    #[must_use]
    pub fn consent_handle(&self) -> ConsentHandle {
        self.consent.clone()
    }

    /// Returns the token of the outstanding request, if any.
    #[must_use]
    pub fn pending_token(&self) -> Option<CorrelationToken> {
        self.consent.pending_token()
    }

    /// Delivers a consent result from the host.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::UnknownToken`] if `token` is not outstanding.
    pub fn deliver(&self, token: CorrelationToken, result: ConsentResult) -> Result<(), GateError> {
        self.consent.deliver(token, result)
    }

    /// Requests all read scopes and waits for the consent result.
    ///
    /// The consent UI is launched exactly once per call, whether or not the
    /// scopes were granted before.
    pub async fn request(&self, provider: &dyn HealthProvider) -> PermissionStatus {
        let _serialized = self.in_flight.lock().await;

        let scopes = PermissionScope::all();
        let token = CorrelationToken(self.next_token.fetch_add(1, Ordering::Relaxed) + 1);
        let (sender, receiver) = oneshot::channel();

        if let Err(e) = self.consent.register(token, sender) {
            tracing::error!(%token, error = %e, "Could not register permission request");
            return PermissionStatus::denied_all(&scopes);
        }
        let _pending = PendingGuard {
            consent: &self.consent,
            token,
        };

        let request = PermissionRequest {
            token,
            scopes: scopes.clone(),
            consent: self.consent.clone(),
        };

        tracing::info!(%token, provider = provider.name(), scopes = scopes.len(), "Launching permission request");

        if let Err(e) = provider.launch_permission_request(request) {
            tracing::warn!(%token, error = %e, "Permission request could not be launched");
            return PermissionStatus::denied_all(&scopes);
        }

        let status = match receiver.await {
            Ok(ConsentResult::Completed { granted }) => PermissionStatus::from_grants(&scopes, &granted),
            Ok(ConsentResult::Cancelled) => {
                tracing::warn!(%token, "Permission dialog dismissed");
                PermissionStatus::denied_all(&scopes)
            }
            Err(_) => {
                tracing::warn!(%token, "Permission flow ended without a result");
                PermissionStatus::denied_all(&scopes)
            }
        };

        tracing::info!(
            %token,
            granted = status.granted,
            denied = status.denied.len(),
            "Permission request finished"
        );
        status
    }

    /// Reports the current grant state without prompting.
    #[must_use]
    pub fn check(&self, provider: &dyn HealthProvider) -> PermissionStatus {
        let scopes = PermissionScope::all();
        match provider.granted_scopes() {
            Ok(granted) => PermissionStatus::from_grants(&scopes, &granted),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read granted scopes");
                PermissionStatus::denied_all(&scopes)
            }
        }
    }
}

/// Withdraws the outstanding request when its waiter goes away.
///
/// Clearing is keyed by token, so it is a no-op once a result has been
/// delivered.
struct PendingGuard<'a> {
    consent: &'a ConsentHandle,
    token: CorrelationToken,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.consent.pending_token() == Some(self.token) {
            tracing::debug!(token = %self.token, "Withdrawing abandoned permission request");
        }
        self.consent.clear(self.token);
    }
}
