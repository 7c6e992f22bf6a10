//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (request counter, latency histogram)
//!
//! Consumers:
//!     → stdout (text or JSON lines)
//!     → GET /metrics (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::{init_metrics, record_request, spawn_upkeep, MetricsError, UPKEEP_INTERVAL};
