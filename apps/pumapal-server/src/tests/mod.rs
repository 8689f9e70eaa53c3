//! Server unit and integration tests.
//!
//! Tests are organized into modules by feature area:
//! - `common` - Shared test helpers and utilities
//! - `health` - Health, readiness and the serve loop
//! - `membership` - Join/leave/update rules through the service layer
//! - `contention` - Lost conditional writes, retries and 409 exhaustion
//! - `sweep` - Expiry sweep
//! - `store_backend` - Storage backend abstraction tests
//! - `handlers` - HTTP handler integration tests

pub mod common;

mod handlers;
