//! Out-of-band delivery of permission consent results.
//!
//! A consent flow is started by the permission gate and finished later by
//! whoever observes the OS result (the provider itself or the host's
//! activity-result callback). Results are matched to the outstanding request
//! by a [`CorrelationToken`]; at most one request is outstanding at a time.

use crate::models::PermissionScope;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::oneshot;

/// Identifies one permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationToken(pub u64);

impl std::fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the consent UI reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentResult {
    /// The UI completed; `granted` lists the scopes the user allowed.
    Completed {
        /// Scopes granted by the user.
        granted: Vec<PermissionScope>,
    },
    /// The UI was dismissed without a result.
    Cancelled,
}

/// Errors that can occur while delivering a consent result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// No outstanding request matches the token.
    #[error("No pending permission request for token {received}")]
    UnknownToken {
        /// The token that was delivered.
        received: CorrelationToken,
    },

    /// Failed to acquire lock on the pending slot.
    #[error("Failed to acquire lock on pending permission request")]
    LockError,
}

#[derive(Debug)]
struct Pending {
    token: CorrelationToken,
    sender: oneshot::Sender<ConsentResult>,
}

/// Cloneable handle used to deliver a consent result to the waiting gate.
#[derive(Debug, Clone, Default)]
pub struct ConsentHandle {
    slot: Arc<Mutex<Option<Pending>>>,
}

impl ConsentHandle {
    /// Creates a handle with no outstanding request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `result` to the request identified by `token`.
    ///
    /// A mismatched token leaves the outstanding request untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::UnknownToken`] if no outstanding request carries
    /// `token`.
    pub fn deliver(&self, token: CorrelationToken, result: ConsentResult) -> Result<(), GateError> {
        let mut slot = self.slot.lock().map_err(|_| GateError::LockError)?;
        match slot.take() {
            Some(pending) if pending.token == token => {
                if pending.sender.send(result).is_err() {
                    tracing::debug!(%token, "Permission requester went away before result arrived");
                }
                Ok(())
            }
            other => {
                *slot = other;
                Err(GateError::UnknownToken { received: token })
            }
        }
    }

    /// Returns the token of the outstanding request, if any.
    #[must_use]
    pub fn pending_token(&self) -> Option<CorrelationToken> {
        self.slot
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|p| p.token))
    }

    /// Registers a new outstanding request, replacing any stale one.
    pub(crate) fn register(
        &self,
        token: CorrelationToken,
        sender: oneshot::Sender<ConsentResult>,
    ) -> Result<(), GateError> {
        let mut slot = self.slot.lock().map_err(|_| GateError::LockError)?;
        if let Some(stale) = slot.replace(Pending { token, sender }) {
            tracing::debug!(token = %stale.token, "Discarding stale permission request");
        }
        Ok(())
    }

    /// Drops the outstanding request if it still carries `token`.
    pub(crate) fn clear(&self, token: CorrelationToken) {
        if let Ok(mut slot) = self.slot.lock() {
            if slot.as_ref().is_some_and(|p| p.token == token) {
                slot.take();
            }
        }
    }
}

/// A request handed to the provider to launch the consent UI.
#[derive(Debug, Clone)]
pub struct PermissionRequest {
    /// Correlates the eventual result with this request.
    pub token: CorrelationToken,
    /// Scopes to ask for.
    pub scopes: Vec<PermissionScope>,
    /// Where to deliver the result.
    pub consent: ConsentHandle,
}

impl PermissionRequest {
    /// Delivers the consent result for this request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is no longer outstanding.
    pub fn complete(&self, result: ConsentResult) -> Result<(), GateError> {
        self.consent.deliver(self.token, result)
    }
}
