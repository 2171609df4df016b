//! API route definitions.
//!
//! This module organizes all HTTP routes for the Healthbridge API server.

mod bridge;
mod health;

pub use bridge::{bridge_routes, BridgeError, PLUGIN_NAME};
pub use health::health_routes;
