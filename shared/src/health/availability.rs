//! Provider availability check.

use crate::provider::{HealthProvider, SdkStatus};
use serde::{Deserialize, Serialize};

/// Result of an availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    /// Whether reads can be served.
    pub available: bool,
    /// The SDK status behind the answer.
    pub status: SdkStatus,
    /// Source provider name.
    pub provider: String,
}

/// Checks whether `provider` is present and usable.
///
/// Never fails: a provider error is logged and reported as unavailable.
pub fn check_availability(provider: &dyn HealthProvider) -> Availability {
    let status = match provider.sdk_status() {
        Ok(status) => status,
        Err(e) => {
            tracing::error!(provider = provider.name(), error = %e, "Availability check failed");
            SdkStatus::Unavailable
        }
    };

    tracing::debug!(provider = provider.name(), %status, "Availability checked");

    Availability {
        available: status.is_available(),
        status,
        provider: provider.name().to_string(),
    }
}
