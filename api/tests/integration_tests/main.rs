//! Integration tests for the Healthbridge API.
//!
//! These tests drive the complete bridge flow over HTTP: availability,
//! permission consent, and normalized reads for every metric.

mod bridge_tests;
mod common;
mod health_tests;
mod permission_tests;
