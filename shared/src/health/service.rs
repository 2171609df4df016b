//! The bridge-facing health service.

use super::availability::{check_availability, Availability};
use super::error::HealthError;
use super::normalizer::normalize;
use super::permissions::{PermissionGate, PermissionStatus};
use super::reader::RecordReader;
use super::request::{ReadRequest, ReadResponse, SamplesRequest};
use crate::models::{MetricType, Sample, TimeRange};
use crate::provider::{ConsentResult, CorrelationToken, GateError, HealthProvider};
use std::sync::Arc;

/// Sequences availability, permissions and reads for the host.
///
/// # Example
///
/// ```
/// use shared::health::{HealthService, ReadRequest};
/// use shared::models::MetricType;
/// use shared::provider::StubProvider;
/// use std::sync::Arc;
///
/// let service = HealthService::new(Arc::new(StubProvider::new()));
/// let response = service
///     .read(
///         MetricType::Steps,
///         &ReadRequest::new("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z"),
///     )
///     .unwrap();
///
/// assert!(response.samples.is_empty());
/// ```
pub struct HealthService {
    provider: Arc<dyn HealthProvider>,
    gate: PermissionGate,
    strict_permissions: bool,
}

impl HealthService {
    /// Creates a service over `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn HealthProvider>) -> Self {
        Self {
            provider,
            gate: PermissionGate::new(),
            strict_permissions: false,
        }
    }

    /// Enables or disables grant checks before reads.
    #[must_use]
    pub fn with_strict_permissions(mut self, strict: bool) -> Self {
        self.strict_permissions = strict;
        self
    }

    /// Returns the source provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Returns the permission gate.
    #[must_use]
    pub fn gate(&self) -> &PermissionGate {
        &self.gate
    }

    /// Reports whether the provider is usable. Never fails.
    #[must_use]
    pub fn is_available(&self) -> Availability {
        check_availability(self.provider.as_ref())
    }

    /// Requests every read scope. Never fails.
    pub async fn request_permissions(&self) -> PermissionStatus {
        self.gate.request(self.provider.as_ref()).await
    }

    /// Reports the current grants without prompting. Never fails.
    #[must_use]
    pub fn check_permissions(&self) -> PermissionStatus {
        self.gate.check(self.provider.as_ref())
    }

    /// Delivers an out-of-band consent result.
    ///
    /// # Errors
    ///
    /// Returns an error if no outstanding request carries `token`.
    pub fn deliver_consent(
        &self,
        token: CorrelationToken,
        result: ConsentResult,
    ) -> Result<(), GateError> {
        self.gate.deliver(token, result)
    }

    /// Handles a `read<Metric>` call.
    ///
    /// The request is validated before the provider is touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is invalid or the read fails.
    pub fn read(&self, metric: MetricType, request: &ReadRequest) -> Result<ReadResponse, HealthError> {
        let range = request.time_range()?;
        let samples = self.read_range(metric, range, request.limit)?;
        Ok(ReadResponse { metric, samples })
    }

    /// Handles the generic `readSamples` call.
    ///
    /// # Errors
    ///
    /// Returns an error if the data type is missing or unknown, or if the
    /// read fails.
    pub fn read_samples(&self, request: &SamplesRequest) -> Result<ReadResponse, HealthError> {
        let metric = request.metric()?;
        self.read(metric, &request.read)
    }

    /// Reads and normalizes one metric over an already parsed window.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider query fails or yields malformed
    /// records.
    pub fn read_range(
        &self,
        metric: MetricType,
        range: TimeRange,
        limit: Option<usize>,
    ) -> Result<Vec<Sample>, HealthError> {
        let records = RecordReader::new(self.provider.as_ref())
            .strict(self.strict_permissions)
            .read(metric, range, limit)?
            .into_records();
        let record_count = records.len();
        let samples = normalize(metric, records)?;

        tracing::info!(
            provider = self.provider.name(),
            %metric,
            records = record_count,
            samples = samples.len(),
            "Read health samples"
        );
        Ok(samples)
    }
}

impl std::fmt::Debug for HealthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthService")
            .field("provider", &self.provider.name())
            .field("strict_permissions", &self.strict_permissions)
            .finish_non_exhaustive()
    }
}
