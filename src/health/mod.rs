//! Store health probing.
//!
//! # Data Flow
//! ```text
//! GET /api/health
//!     → check_store(): ping the store under a timeout
//!     → Reachable → 200 "OK"
//!     → Unreachable → 503 "Database connection error"
//! ```
//!
//! # Design Decisions
//! - Every check is a fresh ping; results are never cached
//! - A timeout counts as unreachable
//! - Probe failures are polls, not request faults, and log at warn

use std::time::Duration;

use tokio::time;

use crate::store::SubmissionStore;

/// Outcome of a single reachability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreHealth {
    Reachable,
    Unreachable,
}

/// Ping the store, giving up after `timeout`.
pub async fn check_store(store: &dyn SubmissionStore, timeout: Duration) -> StoreHealth {
    match time::timeout(timeout, store.ping()).await {
        Ok(Ok(())) => StoreHealth::Reachable,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Health check failed: store error");
            StoreHealth::Unreachable
        }
        Err(_) => {
            tracing::warn!(timeout = ?timeout, "Health check failed: timeout");
            StoreHealth::Unreachable
        }
    }
}
