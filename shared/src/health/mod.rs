//! Availability, permission gating, record reads and normalization.
//!
//! [`HealthService`] ties the pieces together into the call surface the host
//! bridge invokes.

pub mod availability;
pub mod error;
pub mod normalizer;
pub mod permissions;
pub mod reader;
pub mod request;
pub mod service;

pub use availability::{check_availability, Availability};
pub use error::{ErrorCode, HealthError};
pub use normalizer::normalize;
pub use permissions::{PermissionGate, PermissionStatus};
pub use reader::{ReadOutcome, RecordReader};
pub use request::{ReadRequest, ReadResponse, SamplesRequest};
pub use service::HealthService;
