//! Errors surfaced by health reads.

use crate::models::{PermissionScope, TimeRangeError, UnknownMetricType};
use crate::provider::ProviderError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error codes reported across the host boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Provider missing or too old.
    ProviderUnavailable,
    /// Read scope not granted.
    PermissionDenied,
    /// Malformed or inverted date range.
    InvalidRange,
    /// Opaque upstream failure.
    ProviderError,
    /// Required request field absent.
    MissingField,
    /// Request field present but invalid.
    InvalidRequest,
    /// Unrecognized metric tag.
    UnknownMetric,
    /// Unknown bridge method.
    Unimplemented,
    /// Consent result for a request that is not outstanding.
    UnknownToken,
}

impl ErrorCode {
    /// Returns the wire form of the code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::InvalidRange => "INVALID_RANGE",
            Self::ProviderError => "PROVIDER_ERROR",
            Self::MissingField => "MISSING_FIELD",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::UnknownMetric => "UNKNOWN_METRIC",
            Self::Unimplemented => "UNIMPLEMENTED",
            Self::UnknownToken => "UNKNOWN_TOKEN",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while serving a read.
///
/// A read either succeeds with zero or more samples or fails with one of
/// these; partial results are never returned.
#[derive(Debug, Error)]
pub enum HealthError {
    /// The provider is missing or too old.
    #[error("Health provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The metric's read scope has not been granted.
    #[error("Permission denied: {0} has not been granted")]
    PermissionDenied(PermissionScope),

    /// The date range is malformed or inverted.
    #[error("Invalid range: {0}")]
    InvalidRange(#[from] TimeRangeError),

    /// The provider query failed; message passed through verbatim.
    #[error("{0}")]
    Provider(String),

    /// A required request field is missing.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A request field failed validation.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    /// The metric tag is not recognized.
    #[error(transparent)]
    UnknownMetric(#[from] UnknownMetricType),
}

impl HealthError {
    /// Returns the stable code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ProviderUnavailable(_) => ErrorCode::ProviderUnavailable,
            Self::PermissionDenied(_) => ErrorCode::PermissionDenied,
            Self::InvalidRange(_) => ErrorCode::InvalidRange,
            Self::Provider(_) => ErrorCode::ProviderError,
            Self::MissingField(_) => ErrorCode::MissingField,
            Self::InvalidRequest(_) => ErrorCode::InvalidRequest,
            Self::UnknownMetric(_) => ErrorCode::UnknownMetric,
        }
    }
}

impl From<ProviderError> for HealthError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Unavailable(message) => Self::ProviderUnavailable(message),
            ProviderError::PermissionDenied(scope) => Self::PermissionDenied(scope),
            ProviderError::Failed(message) => Self::Provider(message),
        }
    }
}
