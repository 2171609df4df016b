//! Permission-only stub provider.
//!
//! Used where no platform health store exists (web previews, CI). It reports
//! itself unavailable, accepts every consent request and serves no records.
//! Its availability answer is an approximation: it cannot tell whether a
//! real store would have been present.

use super::{ConsentResult, HealthProvider, PermissionRequest, ProviderError, RecordQuery, SdkStatus};
use crate::models::{PermissionScope, Record, RecordKind};

/// A provider that never holds data.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubProvider;

impl StubProvider {
    /// Creates the stub.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn sdk_status(&self) -> Result<SdkStatus, ProviderError> {
        Ok(SdkStatus::Unavailable)
    }

    fn supports(&self, _kind: RecordKind) -> bool {
        false
    }

    fn granted_scopes(&self) -> Result<Vec<PermissionScope>, ProviderError> {
        Ok(PermissionScope::all())
    }

    fn launch_permission_request(&self, request: PermissionRequest) -> Result<(), ProviderError> {
        let granted = request.scopes.clone();
        request
            .complete(ConsentResult::Completed { granted })
            .map_err(|e| ProviderError::Failed(e.to_string()))
    }

    fn read_records(&self, _query: &RecordQuery) -> Result<Vec<Record>, ProviderError> {
        Ok(Vec::new())
    }
}
