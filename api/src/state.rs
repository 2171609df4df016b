//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use crate::config::Config;
use anyhow::{Context, Result};
use shared::health::HealthService;
use shared::provider::{FixtureProvider, HealthProvider, StubProvider};
use std::sync::Arc;

/// Application state shared across all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    service: Arc<HealthService>,
}

impl AppState {
    /// Creates a new application state around an existing service.
    #[must_use]
    pub fn new(service: HealthService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Creates a new application state serving `provider`.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn HealthProvider>) -> Self {
        Self::new(HealthService::new(provider))
    }

    /// Builds the state from configuration.
    ///
    /// A configured fixture always wins. Otherwise the provider is chosen at
    /// build time: the stub with the `stub-provider` feature, an empty
    /// fixture provider without it.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture file cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider: Arc<dyn HealthProvider> = match &config.fixture {
            Some(path) => Arc::new(
                FixtureProvider::from_json_file(path)
                    .with_context(|| format!("Loading fixture {}", path.display()))?,
            ),
            None => default_provider(),
        };

        tracing::info!(
            provider = provider.name(),
            strict_permissions = config.strict_permissions,
            "Health provider selected"
        );

        Ok(Self::new(
            HealthService::new(provider).with_strict_permissions(config.strict_permissions),
        ))
    }

    /// Returns the health service.
    #[must_use]
    pub fn service(&self) -> &HealthService {
        self.service.as_ref()
    }
}

#[cfg(feature = "stub-provider")]
fn default_provider() -> Arc<dyn HealthProvider> {
    Arc::new(StubProvider::new())
}

#[cfg(not(feature = "stub-provider"))]
fn default_provider() -> Arc<dyn HealthProvider> {
    Arc::new(FixtureProvider::new())
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_provider(Arc::new(StubProvider::new()))
    }
}
