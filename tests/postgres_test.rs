//! Tests against a live PostgreSQL instance.
//!
//! Run with `DATABASE_HOST=localhost cargo test -- --ignored`. The usual
//! `DB_PORT`, `DB_USER`, `DB_PASS` and `DB_NAME` variables apply.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Mutex;

use submission_service::config::{self, ServiceConfig};
use submission_service::lifecycle::{self, Shutdown};
use submission_service::store::{NewSubmission, StoreError, SubmissionStore};
use submission_service::SubmissionServer;

// The tests share one table, and one of them plants a bad row.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

fn live_config() -> Option<ServiceConfig> {
    let host = std::env::var("DATABASE_HOST").ok()?;
    let config = config::load_config(None, |key| match key {
        "DB_HOST" => Some(host.clone()),
        other => std::env::var(other).ok(),
    })
    .unwrap();
    Some(config)
}

async fn live_store() -> Option<Arc<dyn SubmissionStore>> {
    let config = live_config()?;
    Some(lifecycle::bootstrap_postgres(&config).await.unwrap())
}

/// A raw connection, for writing rows the store itself would refuse.
async fn raw_client(config: &ServiceConfig) -> tokio_postgres::Client {
    let db = &config.database;
    let (client, connection) = tokio_postgres::Config::new()
        .host(&db.host)
        .port(db.port)
        .user(&db.user)
        .password(&db.password)
        .dbname(&db.name)
        .connect(tokio_postgres::NoTls)
        .await
        .unwrap();
    tokio::spawn(connection);
    client
}

#[tokio::test]
#[ignore]
async fn test_insert_and_list_roundtrip() {
    let _guard = DB_LOCK.lock().await;
    let Some(store) = live_store().await else {
        return;
    };

    store.ensure_schema().await.unwrap();
    store.ping().await.unwrap();

    let first = store.insert(NewSubmission::new("Ada", "Hello").unwrap()).await.unwrap();
    let second = store.insert(NewSubmission::new("Grace", "Hi").unwrap()).await.unwrap();
    assert!(second.id > first.id);

    let rows = store.list().await.unwrap();
    let pos_first = rows.iter().position(|r| r.id == first.id).unwrap();
    let pos_second = rows.iter().position(|r| r.id == second.id).unwrap();
    assert!(pos_second < pos_first, "newest first");
    assert_eq!(rows[pos_first], first);
    assert!(rows.windows(2).all(|w| w[0].id > w[1].id));
}

#[tokio::test]
#[ignore]
async fn test_concurrent_inserts_get_unique_ids() {
    let _guard = DB_LOCK.lock().await;
    let Some(store) = live_store().await else {
        return;
    };

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .insert(NewSubmission::new(format!("writer-{}", i), "concurrent").unwrap())
                .await
                .unwrap()
                .id
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 16);
}

#[tokio::test]
#[ignore]
async fn test_null_column_is_a_decode_error() {
    let _guard = DB_LOCK.lock().await;
    let Some(config) = live_config() else {
        return;
    };
    let store = lifecycle::bootstrap_postgres(&config).await.unwrap();
    let raw = raw_client(&config).await;

    raw.execute("INSERT INTO submissions (name, message) VALUES (NULL, 'x')", &[])
        .await
        .unwrap();

    let listed = store.list().await;

    let shutdown = Shutdown::new();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = SubmissionServer::new(config.clone(), store.clone(), None);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    let res = reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
        .get(format!("http://{}/api/submissions", addr))
        .send()
        .await
        .unwrap();
    let status = res.status();
    let body = res.text().await.unwrap();
    shutdown.trigger();

    raw.execute("DELETE FROM submissions WHERE name IS NULL", &[])
        .await
        .unwrap();

    assert!(
        matches!(listed, Err(StoreError::Decode(_))),
        "expected a decode error, got {:?}",
        listed
    );
    assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Error scanning data");
}
