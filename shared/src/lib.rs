//! Healthbridge Shared Library
//!
//! This crate contains the sample model, the provider capability and the
//! read pipeline used by the Healthbridge API and CLI.
//!
//! # Modules
//!
//! - [`models`] - Samples, metric families, read windows and native records
//! - [`provider`] - The `HealthProvider` trait and its fixture/stub implementations
//! - [`health`] - Availability checks, permission gate, reader, normalizer and service
//!
//! # Example
//!
//! ```
//! use shared::health::{HealthService, ReadRequest};
//! use shared::models::{MetricType, Record};
//! use shared::provider::FixtureProvider;
//! use std::sync::Arc;
//!
//! let provider = FixtureProvider::new().with_record(Record::RestingHeartRate {
//!     time: "2024-01-01T06:00:00Z".parse().unwrap(),
//!     beats_per_minute: 54,
//! });
//! let service = HealthService::new(Arc::new(provider));
//!
//! let response = service
//!     .read(
//!         MetricType::RestingHeartRate,
//!         &ReadRequest::new("2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z"),
//!     )
//!     .unwrap();
//!
//! assert_eq!(response.samples[0].value, 54.0);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod health;
pub mod models;
pub mod provider;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;
