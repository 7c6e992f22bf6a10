//! Store bootstrap.
//!
//! # Responsibilities
//! - Open a store connection, retrying per the configured policy
//! - Verify reachability with an explicit ping (not retried)
//! - Create the submissions table if it is missing
//!
//! # Design Decisions
//! - Fail fast: any error here is fatal to the process
//! - The listener is bound only after bootstrap returns a verified handle

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::config::ServiceConfig;
use crate::resilience::RetryPolicy;
use crate::store::{PgStore, StoreError, SubmissionStore};

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to connect to database after {attempts} attempts: {source}")]
    Connect {
        attempts: u32,
        #[source]
        source: StoreError,
    },

    #[error("unable to reach the database: {0}")]
    Ping(#[source] StoreError),

    #[error("error creating table: {0}")]
    Schema(#[source] StoreError),
}

/// Run the bootstrap sequence against any store.
///
/// `connect` is called once per attempt with the 1-based attempt number.
pub async fn bootstrap<S, F, Fut>(policy: &RetryPolicy, connect: F) -> Result<S, BootstrapError>
where
    S: SubmissionStore,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<S, StoreError>>,
{
    let store = policy
        .run("database connect", connect)
        .await
        .map_err(|e| BootstrapError::Connect {
            attempts: e.attempts,
            source: e.last,
        })?;

    store.ping().await.map_err(BootstrapError::Ping)?;
    tracing::info!("Connected to the database successfully");

    store.ensure_schema().await.map_err(BootstrapError::Schema)?;
    tracing::info!(table = "submissions", "Schema ensured");

    Ok(store)
}

/// Bootstrap the PostgreSQL store described by `config`.
pub async fn bootstrap_postgres(
    config: &ServiceConfig,
) -> Result<Arc<dyn SubmissionStore>, BootstrapError> {
    let policy = RetryPolicy::from_config(&config.bootstrap);

    tracing::info!(
        host = %config.database.host,
        port = config.database.port,
        database = %config.database.name,
        max_attempts = policy.max_attempts(),
        "Connecting to database"
    );

    let store = bootstrap(&policy, |_| PgStore::connect(&config.database)).await?;
    Ok(Arc::new(store))
}
