//! Time-bounded record reads.

use super::error::HealthError;
use crate::models::{MetricType, Record, TimeRange};
use crate::provider::{HealthProvider, RecordQuery};

/// What a read produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// The provider answered with these records, in provider order.
    Records(Vec<Record>),
    /// The provider cannot serve this record family; treated as no data.
    Unsupported,
}

impl ReadOutcome {
    /// Returns the records, or an empty list for unsupported families.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::Records(records) => records,
            Self::Unsupported => Vec::new(),
        }
    }
}

/// Issues record queries against a provider.
pub struct RecordReader<'a> {
    provider: &'a dyn HealthProvider,
    strict_permissions: bool,
}

impl<'a> RecordReader<'a> {
    /// Creates a reader that does not check grants before reading.
    #[must_use]
    pub fn new(provider: &'a dyn HealthProvider) -> Self {
        Self {
            provider,
            strict_permissions: false,
        }
    }

    /// Requires the metric's scope to be granted before every read.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_permissions = strict;
        self
    }

    /// Reads the native records of `metric` inside `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Strict mode is on and the scope is not granted
    /// - The provider query fails
    pub fn read(
        &self,
        metric: MetricType,
        range: TimeRange,
        limit: Option<usize>,
    ) -> Result<ReadOutcome, HealthError> {
        let kind = metric.record_kind();

        if !self.provider.supports(kind) {
            tracing::debug!(
                provider = self.provider.name(),
                %metric,
                "Record family not supported, returning no data"
            );
            return Ok(ReadOutcome::Unsupported);
        }

        if self.strict_permissions {
            let scope = metric.scope();
            if !self.provider.granted_scopes()?.contains(&scope) {
                return Err(HealthError::PermissionDenied(scope));
            }
        }

        let mut query = RecordQuery::new(kind, range);
        if let Some(limit) = limit {
            query = query.with_limit(limit);
        }

        let records = self.provider.read_records(&query).map_err(|e| {
            tracing::warn!(provider = self.provider.name(), %metric, error = %e, "Record query failed");
            HealthError::from(e)
        })?;

        tracing::debug!(%metric, records = records.len(), "Records read");
        Ok(ReadOutcome::Records(records))
    }
}
