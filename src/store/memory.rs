//! In-process submission store.
//!
//! Holds rows in a mutex-guarded vector and can be told to fail, which makes
//! it a drop-in substitute for PostgreSQL when exercising the HTTP layer.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::store::{NewSubmission, StoreError, Submission, SubmissionStore};

#[derive(Debug, Default)]
struct Rows {
    rows: Vec<Submission>,
    last_id: i32,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Rows>,
    unreachable: AtomicBool,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    stalled: AtomicBool,
    operations: AtomicUsize,
}

impl MemoryStore {
    /// An empty, healthy store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ping` (and schema creation) fail while set.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Make `insert` fail while set. No row is written.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make `list` fail while set.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make `insert` and `list` hang forever while set.
    pub fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    /// Number of store calls made so far, successful or not.
    pub fn operations(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    /// Rows currently stored.
    pub fn len(&self) -> usize {
        self.rows.lock().expect("memory store mutex poisoned").rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self, flag: &AtomicBool, what: &str) -> Result<(), StoreError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("{} rejected", what)));
        }
        Ok(())
    }

    async fn stall(&self) {
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check(&self.unreachable, "ping")
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.check(&self.unreachable, "schema")
    }

    async fn insert(&self, submission: NewSubmission) -> Result<Submission, StoreError> {
        self.check(&self.fail_writes, "insert")?;
        self.stall().await;

        let mut guard = self.rows.lock().expect("memory store mutex poisoned");
        guard.last_id += 1;
        let stored = Submission {
            id: guard.last_id,
            name: submission.name,
            message: submission.message,
        };
        guard.rows.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Submission>, StoreError> {
        self.check(&self.fail_reads, "query")?;
        self.stall().await;

        let guard = self.rows.lock().expect("memory store mutex poisoned");
        let mut rows = guard.rows.clone();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }
}
