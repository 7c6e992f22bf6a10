//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by route path and method
//! - `http_request_duration_seconds` (histogram): latency by route path and method
//!
//! # Design Decisions
//! - One process-wide Prometheus recorder; repeated init returns the same handle
//! - Path label is the route template, so label cardinality stays fixed
//! - Histogram buckets follow the conventional Prometheus defaults
//! - `install_recorder` spawns no upkeep, so `spawn_upkeep` drains histogram
//!   buffers on a fixed interval

use std::sync::Mutex;
use std::time::{Duration, Instant};

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;
use tokio::task::JoinHandle;

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

const DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// How often histogram buffers are folded into the exported state.
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

static HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to install Prometheus recorder: {0}")]
    Build(#[from] BuildError),

    #[error("metrics registry lock poisoned")]
    Poisoned,
}

/// Install the Prometheus recorder, or return the one already installed.
pub fn init_metrics() -> Result<PrometheusHandle, MetricsError> {
    let mut slot = HANDLE.lock().map_err(|_| MetricsError::Poisoned)?;
    if let Some(handle) = slot.as_ref() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION_SECONDS.to_string()), DURATION_BUCKETS)?
        .install_recorder()?;

    metrics::describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests");
    metrics::describe_histogram!(
        REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Duration of HTTP requests in seconds"
    );

    tracing::info!("Prometheus recorder installed");
    *slot = Some(handle.clone());
    Ok(handle)
}

/// Run recorder upkeep every `interval` until the task is aborted.
pub fn spawn_upkeep(handle: PrometheusHandle, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            handle.run_upkeep();
        }
    })
}

/// Count one request and observe its latency.
pub fn record_request(path: &str, method: &str, started: Instant) {
    metrics::counter!(REQUESTS_TOTAL, "path" => path.to_string(), "method" => method.to_string())
        .increment(1);
    metrics::histogram!(
        REQUEST_DURATION_SECONDS,
        "path" => path.to_string(),
        "method" => method.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}
