//! Health-data provider capability.
//!
//! The `HealthProvider` trait is the seam to the platform health store:
//! availability, consent launching, grant inspection and time-bounded record
//! queries. Two implementations ship with the crate: a fixture-backed
//! provider used for development and tests, and a permission-only stub.

pub mod consent;
pub mod fixture;
pub mod stub;

pub use consent::{ConsentHandle, ConsentResult, CorrelationToken, GateError, PermissionRequest};
pub use fixture::{FixtureError, FixtureProvider};
pub use stub::StubProvider;

use crate::models::{PermissionScope, Record, RecordKind, TimeRange};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// SDK status reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SdkStatus {
    /// The provider is installed and usable.
    Available,
    /// The provider is missing on this device.
    Unavailable,
    /// The provider is installed but too old.
    UpdateRequired,
}

impl SdkStatus {
    /// Returns true only for [`SdkStatus::Available`].
    #[must_use]
    pub fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

impl std::fmt::Display for SdkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::UpdateRequired => write!(f, "updateRequired"),
        }
    }
}

/// Errors raised by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider is missing or too old to serve the call.
    #[error("Health provider unavailable: {0}")]
    Unavailable(String),

    /// The platform refused the call for lack of a read scope.
    #[error("Permission denied for {0}")]
    PermissionDenied(PermissionScope),

    /// Any other upstream failure; the message is passed through verbatim.
    #[error("{0}")]
    Failed(String),
}

/// A time-bounded query for one record family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    /// The record family to read.
    pub kind: RecordKind,
    /// The read window.
    pub range: TimeRange,
    /// Maximum number of records to return.
    pub limit: Option<usize>,
}

impl RecordQuery {
    /// Creates an unlimited query.
    #[must_use]
    pub fn new(kind: RecordKind, range: TimeRange) -> Self {
        Self {
            kind,
            range,
            limit: None,
        }
    }

    /// Sets the page size.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Trait for platform health-data providers.
///
/// Implementations must be safe to share across request handlers.
pub trait HealthProvider: Send + Sync {
    /// Returns the source provider name (e.g. `"health_connect"`).
    fn name(&self) -> &'static str;

    /// Queries the SDK status.
    ///
    /// # Errors
    ///
    /// Returns an error if the status cannot be determined.
    fn sdk_status(&self) -> Result<SdkStatus, ProviderError>;

    /// Returns true if the provider can serve the given record family.
    fn supports(&self, kind: RecordKind) -> bool;

    /// Returns the read scopes currently granted to the application.
    ///
    /// # Errors
    ///
    /// Returns an error if the grant set cannot be queried.
    fn granted_scopes(&self) -> Result<Vec<PermissionScope>, ProviderError>;

    /// Launches the consent UI for the scopes in `request`.
    ///
    /// The outcome is delivered later through `request.consent`, tagged with
    /// `request.token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the consent UI cannot be launched.
    fn launch_permission_request(&self, request: PermissionRequest) -> Result<(), ProviderError>;

    /// Reads the records of one family inside the query window, in provider
    /// order.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider query fails.
    fn read_records(&self, query: &RecordQuery) -> Result<Vec<Record>, ProviderError>;
}
