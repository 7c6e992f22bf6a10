//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span, timeout)
//!     → middleware.rs (request count + latency, when metrics are enabled)
//!     → handlers.rs (validate, one store call, map errors to status codes)
//!     → CORS headers added to the response
//!     → Send to client
//! ```
//!
//! Every request runs on its own Tokio task; handlers share nothing but the
//! store handle in `AppState`.

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, SubmissionServer};
