//! Submission ingestion and retrieval service.
//!
//! Accepts name/message pairs over HTTP, stores them in PostgreSQL and
//! serves them back newest first.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod store;

pub use config::ServiceConfig;
pub use http::SubmissionServer;
pub use lifecycle::Shutdown;
pub use store::{MemoryStore, NewSubmission, PgStore, Submission, SubmissionStore};
