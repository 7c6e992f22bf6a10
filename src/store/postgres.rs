//! PostgreSQL-backed submission store.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime, Timeouts};
use tokio_postgres::{NoTls, Row};

use crate::config::DatabaseConfig;
use crate::store::{NewSubmission, StoreError, Submission, SubmissionStore};

const CREATE_TABLE_SQL: &str = "
CREATE TABLE IF NOT EXISTS submissions (
    id SERIAL PRIMARY KEY,
    name TEXT,
    message TEXT
)";

const INSERT_SQL: &str = "INSERT INTO submissions (name, message) VALUES ($1, $2) RETURNING id";

const LIST_SQL: &str = "SELECT id, name, message FROM submissions ORDER BY id DESC";

/// Connection pool shared by every request handler.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    /// Build the pool and open one connection through it.
    ///
    /// Opening a connection does not run any query; reachability is checked
    /// separately with [`SubmissionStore::ping`].
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let connect_timeout = Duration::from_secs(config.connect_timeout_secs);

        let mut pg = Config::new();
        pg.host = Some(config.host.clone());
        pg.port = Some(config.port);
        pg.user = Some(config.user.clone());
        pg.password = Some(config.password.clone());
        pg.dbname = Some(config.name.clone());
        pg.connect_timeout = Some(connect_timeout);
        pg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        pg.pool = Some(PoolConfig {
            max_size: config.pool_max_size,
            timeouts: Timeouts {
                wait: Some(connect_timeout),
                create: Some(connect_timeout),
                recycle: Some(connect_timeout),
            },
            ..Default::default()
        });

        let pool = pg.create_pool(Some(Runtime::Tokio1), NoTls)?;
        drop(pool.get().await?);

        tracing::debug!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            pool_max_size = config.pool_max_size,
            "Opened PostgreSQL connection"
        );

        Ok(Self { pool })
    }
}

fn decode(row: &Row) -> Result<Submission, StoreError> {
    Ok(Submission {
        id: row.try_get("id").map_err(StoreError::Decode)?,
        name: row.try_get("name").map_err(StoreError::Decode)?,
        message: row.try_get("message").map_err(StoreError::Decode)?,
    })
}

#[async_trait]
impl SubmissionStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        client.simple_query("SELECT 1").await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        client.batch_execute(CREATE_TABLE_SQL).await?;
        Ok(())
    }

    async fn insert(&self, submission: NewSubmission) -> Result<Submission, StoreError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(INSERT_SQL, &[&submission.name(), &submission.message()])
            .await?;
        let id: i32 = row.try_get(0).map_err(StoreError::Decode)?;
        Ok(Submission {
            id,
            name: submission.name,
            message: submission.message,
        })
    }

    async fn list(&self) -> Result<Vec<Submission>, StoreError> {
        let client = self.pool.get().await?;
        let rows = client.query(LIST_SQL, &[]).await?;
        rows.iter().map(decode).collect()
    }
}
