//! Shared utilities for integration and load testing.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use submission_service::config::ServiceConfig;
use submission_service::lifecycle::Shutdown;
use submission_service::{MemoryStore, SubmissionServer};

/// A running service backed by an in-memory store.
pub struct TestService {
    pub addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    shutdown: Shutdown,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the service on an ephemeral port without instrumentation.
pub async fn start_service() -> TestService {
    start_with(ServiceConfig::default(), None).await
}

/// Start the service with an explicit config and optional metrics handle.
pub async fn start_with(
    mut config: ServiceConfig,
    metrics: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> TestService {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let store = Arc::new(MemoryStore::new());
    let shutdown = Shutdown::new();
    let server = SubmissionServer::new(config, store.clone(), metrics);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestService {
        addr,
        store,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// POST a form to `/api/submit`.
pub async fn submit(
    client: &reqwest::Client,
    service: &TestService,
    name: &str,
    message: &str,
) -> reqwest::Response {
    client
        .post(service.url("/api/submit"))
        .form(&[("name", name), ("message", message)])
        .send()
        .await
        .expect("service unreachable")
}

/// GET `/api/submissions` and decode the body.
pub async fn list(client: &reqwest::Client, service: &TestService) -> serde_json::Value {
    let res = client
        .get(service.url("/api/submissions"))
        .send()
        .await
        .expect("service unreachable");
    assert_eq!(res.status(), 200);
    res.json().await.unwrap()
}
