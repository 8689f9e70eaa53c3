//! Storage abstraction for PumaPal.
//!
//! Backend crates (pumapal-store-sqlite, pumapal-store-postgres) implement [`Store`] so the
//! server doesn't depend on any specific database engine or schema details. The domain
//! types and the membership rules live here too, so every backend applies the same
//! invariants.

use thiserror::Error;

pub mod membership;
mod store;
pub mod types;

pub use membership::{JoinOutcome, LeaveOutcome, Membership, MembershipError};
pub use store::Store;
pub use types::*;

/// Uniform error type for all storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    /// A conditional write lost against a concurrent writer (stale `version`).
    #[error("conflict")]
    Conflict,
    #[error("backend error: {0}")]
    Backend(String),
}
