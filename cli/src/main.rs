//! Healthbridge CLI
//!
//! Command-line interface for reading normalized health samples without
//! going through the HTTP bridge.
//!
//! # Usage
//!
//! ```bash
//! healthbridge --help
//! healthbridge --fixture records.json available
//! healthbridge --fixture records.json permissions
//! healthbridge --fixture records.json read heartRate \
//!     --start 2024-01-01T00:00:00Z --end 2024-01-02T00:00:00Z
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use shared::health::{HealthService, ReadRequest};
use shared::models::MetricType;
use shared::provider::{FixtureProvider, HealthProvider};
use std::path::PathBuf;
use std::sync::Arc;

/// Healthbridge CLI - health sample read adapter
#[derive(Parser)]
#[command(name = "healthbridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON fixture of native records to serve
    #[arg(short, long, env = "HEALTHBRIDGE_FIXTURE")]
    fixture: Option<PathBuf>,

    /// Require the metric's read scope to be granted before reading
    #[arg(long, env = "HEALTHBRIDGE_STRICT_PERMISSIONS")]
    strict_permissions: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether the health provider is usable
    Available,

    /// Request every read scope, or only report current grants
    Permissions {
        /// Report grants without prompting
        #[arg(long)]
        check: bool,
    },

    /// Read normalized samples for one metric
    Read {
        /// Metric to read (steps, heartRate, restingHeartRate, hrv, spo2, sleep)
        metric: MetricType,

        /// Window start (ISO-8601)
        #[arg(short, long)]
        start: String,

        /// Window end (ISO-8601)
        #[arg(short, long)]
        end: String,

        /// Maximum number of native records to read
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Healthbridge CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("Use --help for usage information");
        return Ok(());
    };

    let service = build_service(cli.fixture.as_ref())?
        .with_strict_permissions(cli.strict_permissions);

    match command {
        Commands::Available => print_json(&service.is_available()),
        Commands::Permissions { check: true } => print_json(&service.check_permissions()),
        Commands::Permissions { check: false } => {
            print_json(&service.request_permissions().await)
        }
        Commands::Read {
            metric,
            start,
            end,
            limit,
        } => {
            let request = ReadRequest {
                limit,
                ..ReadRequest::new(start, end)
            };
            let response = service
                .read(metric, &request)
                .map_err(|e| anyhow::anyhow!("{}: {e}", e.code()))?;
            print_json(&response)
        }
    }
}

fn build_service(fixture: Option<&PathBuf>) -> Result<HealthService> {
    let provider: Arc<dyn HealthProvider> = match fixture {
        Some(path) => Arc::new(
            FixtureProvider::from_json_file(path)
                .with_context(|| format!("Loading fixture {}", path.display()))?,
        ),
        None => default_provider(),
    };
    tracing::debug!(provider = provider.name(), "Health provider selected");
    Ok(HealthService::new(provider))
}

#[cfg(feature = "stub-provider")]
fn default_provider() -> Arc<dyn HealthProvider> {
    Arc::new(shared::provider::StubProvider::new())
}

#[cfg(not(feature = "stub-provider"))]
fn default_provider() -> Arc<dyn HealthProvider> {
    Arc::new(FixtureProvider::new())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
