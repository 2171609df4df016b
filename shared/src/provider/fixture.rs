//! Fixture-backed provider.
//!
//! Serves a fixed list of native records, loaded from JSON or built in code,
//! and resolves consent requests immediately. Failure modes can be injected
//! to exercise error paths.

use super::{
    ConsentResult, HealthProvider, PermissionRequest, ProviderError, RecordQuery, SdkStatus,
};
use crate::models::{PermissionScope, Record, RecordKind};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};
use thiserror::Error;

/// Errors that can occur while loading a fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        /// Path of the fixture.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The fixture is not valid JSON for the expected shape.
    #[error("Invalid fixture: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk fixture layout.
#[derive(Debug, Deserialize)]
struct FixtureFile {
    #[serde(default = "default_status")]
    status: SdkStatus,
    #[serde(default)]
    records: Vec<Record>,
}

fn default_status() -> SdkStatus {
    SdkStatus::Available
}

/// How the provider answers consent requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsentMode {
    /// Complete inside `launch_permission_request`.
    Immediate,
    /// Leave the request outstanding for the host to complete.
    Manual,
}

/// A provider backed by an in-memory list of records.
///
/// # Example
///
/// ```
/// use shared::models::{Record, TimeRange};
/// use shared::provider::{FixtureProvider, HealthProvider, RecordQuery};
///
/// let range = TimeRange::parse("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z").unwrap();
/// let provider = FixtureProvider::new().with_record(Record::Steps {
///     start: range.start,
///     end: range.start + chrono::Duration::hours(1),
///     count: 250,
/// });
///
/// let records = provider
///     .read_records(&RecordQuery::new(shared::models::RecordKind::Steps, range))
///     .unwrap();
/// assert_eq!(records.len(), 1);
/// ```
#[derive(Debug)]
pub struct FixtureProvider {
    records: Vec<Record>,
    status: SdkStatus,
    unsupported: HashSet<RecordKind>,
    granted: RwLock<HashSet<PermissionScope>>,
    refused: HashSet<PermissionScope>,
    consent_mode: ConsentMode,
    status_failure: Option<String>,
    launch_failure: Option<String>,
    read_failure: Option<ProviderError>,
    read_calls: AtomicUsize,
    launched: Mutex<Vec<PermissionRequest>>,
}

impl Default for FixtureProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureProvider {
    /// Creates an available provider with no records and no grants.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            status: SdkStatus::Available,
            unsupported: HashSet::new(),
            granted: RwLock::new(HashSet::new()),
            refused: HashSet::new(),
            consent_mode: ConsentMode::Immediate,
            status_failure: None,
            launch_failure: None,
            read_failure: None,
            read_calls: AtomicUsize::new(0),
            launched: Mutex::new(Vec::new()),
        }
    }

    /// Loads a fixture from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the fixture layout.
    pub fn from_json_str(json: &str) -> Result<Self, FixtureError> {
        let file: FixtureFile = serde_json::from_str(json)?;
        Ok(Self::new()
            .with_status(file.status)
            .with_records(file.records))
    }

    /// Loads a fixture from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let provider = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            records = provider.records.len(),
            "Loaded health fixture"
        );
        Ok(provider)
    }

    /// Appends one record.
    #[must_use]
    pub fn with_record(mut self, record: Record) -> Self {
        self.records.push(record);
        self
    }

    /// Appends records in order.
    #[must_use]
    pub fn with_records(mut self, records: impl IntoIterator<Item = Record>) -> Self {
        self.records.extend(records);
        self
    }

    /// Sets the reported SDK status.
    #[must_use]
    pub fn with_status(mut self, status: SdkStatus) -> Self {
        self.status = status;
        self
    }

    /// Marks a record family as not served by this provider.
    #[must_use]
    pub fn without_support(mut self, kind: RecordKind) -> Self {
        self.unsupported.insert(kind);
        self
    }

    /// Pre-grants scopes, as if consent had been given earlier.
    #[must_use]
    pub fn with_granted(self, scopes: impl IntoIterator<Item = PermissionScope>) -> Self {
        if let Ok(mut granted) = self.granted.write() {
            granted.extend(scopes);
        }
        self
    }

    /// Makes the simulated user refuse a scope in the consent UI.
    #[must_use]
    pub fn refusing(mut self, scope: PermissionScope) -> Self {
        self.refused.insert(scope);
        self
    }

    /// Leaves consent requests outstanding instead of completing them.
    #[must_use]
    pub fn with_manual_consent(mut self) -> Self {
        self.consent_mode = ConsentMode::Manual;
        self
    }

    /// Makes `sdk_status` fail with `message`.
    #[must_use]
    pub fn with_status_failure(mut self, message: impl Into<String>) -> Self {
        self.status_failure = Some(message.into());
        self
    }

    /// Makes `launch_permission_request` fail with `message`.
    #[must_use]
    pub fn with_launch_failure(mut self, message: impl Into<String>) -> Self {
        self.launch_failure = Some(message.into());
        self
    }

    /// Makes every `read_records` call fail with `error`.
    #[must_use]
    pub fn with_read_failure(mut self, error: ProviderError) -> Self {
        self.read_failure = Some(error);
        self
    }

    /// Returns how many times `read_records` was called.
    #[must_use]
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    /// Returns the requests passed to `launch_permission_request`, oldest first.
    #[must_use]
    pub fn launched_requests(&self) -> Vec<PermissionRequest> {
        self.launched
            .lock()
            .map(|launched| launched.clone())
            .unwrap_or_default()
    }

    fn apply_consent(&self, requested: &[PermissionScope]) -> Vec<PermissionScope> {
        let allowed: Vec<PermissionScope> = requested
            .iter()
            .copied()
            .filter(|scope| !self.refused.contains(scope))
            .collect();
        if let Ok(mut granted) = self.granted.write() {
            granted.extend(allowed.iter().copied());
        }
        allowed
    }
}

impl HealthProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn sdk_status(&self) -> Result<SdkStatus, ProviderError> {
        match &self.status_failure {
            Some(message) => Err(ProviderError::Failed(message.clone())),
            None => Ok(self.status),
        }
    }

    fn supports(&self, kind: RecordKind) -> bool {
        !self.unsupported.contains(&kind)
    }

    fn granted_scopes(&self) -> Result<Vec<PermissionScope>, ProviderError> {
        let granted = self
            .granted
            .read()
            .map_err(|_| ProviderError::Failed("grant set lock poisoned".to_string()))?;
        Ok(PermissionScope::all()
            .into_iter()
            .filter(|scope| granted.contains(scope))
            .collect())
    }

    fn launch_permission_request(&self, request: PermissionRequest) -> Result<(), ProviderError> {
        if let Some(message) = &self.launch_failure {
            return Err(ProviderError::Failed(message.clone()));
        }
        if let Ok(mut launched) = self.launched.lock() {
            launched.push(request.clone());
        }
        if self.consent_mode == ConsentMode::Manual {
            return Ok(());
        }

        let granted = self.apply_consent(&request.scopes);
        request
            .complete(ConsentResult::Completed { granted })
            .map_err(|e| ProviderError::Failed(e.to_string()))
    }

    fn read_records(&self, query: &RecordQuery) -> Result<Vec<Record>, ProviderError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.read_failure {
            return Err(error.clone());
        }

        let matching = self
            .records
            .iter()
            .filter(|r| r.kind() == query.kind && query.range.contains(r.anchor_time()))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(matching)
    }
}
