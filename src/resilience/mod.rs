//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Startup connection to the store:
//!     → retries.rs (RetryPolicy: attempt budget, report each failure)
//!     → backoff.rs (delay between attempts: fixed or exponential)
//! ```
//!
//! # Design Decisions
//! - Policy objects hold no I/O so they can be tested on their own
//! - Fixed backoff without jitter is the default schedule

pub mod backoff;
pub mod retries;

pub use backoff::Backoff;
pub use retries::{RetryError, RetryPolicy};
