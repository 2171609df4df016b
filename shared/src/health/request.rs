//! Request and response shapes exchanged with the host.

use super::error::HealthError;
use crate::models::{MetricType, Sample, TimeRange};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of a `read<Metric>` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReadRequest {
    /// ISO-8601 start of the window.
    pub start_date: Option<String>,

    /// ISO-8601 end of the window.
    pub end_date: Option<String>,

    /// Maximum number of native records to read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "limit must be at least 1"))]
    pub limit: Option<usize>,
}

impl ReadRequest {
    /// Creates a request for the given window.
    #[must_use]
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
            limit: None,
        }
    }

    /// Sets the record limit.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Checks required fields and parses the window.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `startDate` or `endDate` is absent
    /// - `limit` fails validation
    /// - The dates are not ISO-8601 instants (empty included) or are inverted
    pub fn time_range(&self) -> Result<TimeRange, HealthError> {
        let start = self
            .start_date
            .as_deref()
            .ok_or(HealthError::MissingField("startDate"))?;
        let end = self
            .end_date
            .as_deref()
            .ok_or(HealthError::MissingField("endDate"))?;
        self.validate()?;
        Ok(TimeRange::parse(start, end)?)
    }
}

/// Body of the generic `readSamples` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplesRequest {
    /// Metric tag, e.g. `heartRate`.
    pub data_type: Option<String>,

    /// The window and limit.
    #[serde(flatten)]
    pub read: ReadRequest,
}

impl SamplesRequest {
    /// Resolves the requested metric.
    ///
    /// # Errors
    ///
    /// Returns an error if `dataType` is absent or unknown.
    pub fn metric(&self) -> Result<MetricType, HealthError> {
        let tag = self
            .data_type
            .as_deref()
            .ok_or(HealthError::MissingField("dataType"))?;
        Ok(tag.parse()?)
    }
}

/// Response of every read call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadResponse {
    /// The metric that was read.
    #[serde(rename = "type")]
    pub metric: MetricType,
    /// Samples in provider order; possibly empty.
    pub samples: Vec<Sample>,
}
