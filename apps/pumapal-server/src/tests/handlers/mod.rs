//! HTTP handler integration tests.
//!
//! These tests drive the real router over a loopback socket with reqwest.

mod end_to_end;
mod study_groups;
