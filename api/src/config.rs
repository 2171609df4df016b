//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `HEALTHBRIDGE_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `HEALTHBRIDGE_PORT`: The port to listen on (default: 8080)
/// - `HEALTHBRIDGE_FIXTURE`: JSON fixture of native records served by the provider
/// - `HEALTHBRIDGE_STRICT_PERMISSIONS`: Require granted scopes before reads (default: false)
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Optional fixture file for the fixture provider.
    pub fixture: Option<PathBuf>,
    /// Whether reads require the metric scope to be granted.
    pub strict_permissions: bool,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `HEALTHBRIDGE_PORT` is set but cannot be parsed as a valid port number
    /// - `HEALTHBRIDGE_STRICT_PERMISSIONS` is set but is not `true` or `false`
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HEALTHBRIDGE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("HEALTHBRIDGE_PORT")
            .ok()
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("HEALTHBRIDGE_PORT must be a port number")?
            .unwrap_or(8080);

        let fixture = std::env::var("HEALTHBRIDGE_FIXTURE")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let strict_permissions = std::env::var("HEALTHBRIDGE_STRICT_PERMISSIONS")
            .ok()
            .map(|v| v.parse::<bool>())
            .transpose()
            .context("HEALTHBRIDGE_STRICT_PERMISSIONS must be true or false")?
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            fixture,
            strict_permissions,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port do not form a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            fixture: None,
            strict_permissions: false,
        }
    }
}
