//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → connect with retry → ping → ensure schema → store handle
//!
//! Shutdown (shutdown.rs):
//!     Signal received → stop accepting → drain in-flight requests → drop pool
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then store, then listener
//! - No partially started state: the listener only exists after bootstrap

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{bootstrap, bootstrap_postgres, BootstrapError};
