//! Submission persistence subsystem.
//!
//! # Data Flow
//! ```text
//! lifecycle::startup (bootstrap)
//!     → postgres.rs: PgStore::connect (pool + first connection)
//!     → ping, ensure_schema
//!     → Arc<dyn SubmissionStore> handed to the HTTP layer
//!
//! Per request:
//!     handler → SubmissionStore::{ping, insert, list} → pooled connection
//! ```
//!
//! # Design Decisions
//! - The store is the only generator of submission ids
//! - `NewSubmission` can only be built from non-empty fields
//! - The handle is injected into handlers; nothing is global
//! - `MemoryStore` stands in for PostgreSQL in tests

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A persisted name/message pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i32,
    pub name: String,
    pub message: String,
}

/// A submission that has not been stored yet. Both fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    name: String,
    message: String,
}

/// Rejected because a required field was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("missing field: {0}")]
pub struct MissingField(pub &'static str);

impl NewSubmission {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Result<Self, MissingField> {
        let name = name.into();
        let message = message.into();
        if name.is_empty() {
            return Err(MissingField("name"));
        }
        if message.is_empty() {
            return Err(MissingField("message"));
        }
        Ok(Self { name, message })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to build connection pool: {0}")]
    CreatePool(#[from] deadpool_postgres::CreatePoolError),

    #[error("no connection available: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("query failed: {0}")]
    Query(#[from] tokio_postgres::Error),

    #[error("failed to decode row: {0}")]
    Decode(#[source] tokio_postgres::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read/write access to persisted submissions.
///
/// Implementations must be safe to call from many requests at once.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Verify the store answers a trivial query.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Create the submissions table if it does not exist.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Persist a submission atomically and return it with its assigned id.
    async fn insert(&self, submission: NewSubmission) -> Result<Submission, StoreError>;

    /// All submissions, newest (highest id) first.
    async fn list(&self) -> Result<Vec<Submission>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_submission_requires_both_fields() {
        assert_eq!(NewSubmission::new("", "Hi"), Err(MissingField("name")));
        assert_eq!(NewSubmission::new("Ada", ""), Err(MissingField("message")));

        let ok = NewSubmission::new("Ada", "Hello").unwrap();
        assert_eq!(ok.name(), "Ada");
        assert_eq!(ok.message(), "Hello");
    }

    #[test]
    fn test_submission_json_shape() {
        let s = Submission {
            id: 1,
            name: "Ada".into(),
            message: "Hello".into(),
        };
        assert_eq!(
            serde_json::to_string(&s).unwrap(),
            r#"{"id":1,"name":"Ada","message":"Hello"}"#
        );
    }
}
