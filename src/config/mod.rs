//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → optional TOML file (loader.rs)
//!     → environment overlay: DB_HOST, DB_PORT, DB_USER, DB_PASS, DB_NAME, BACKEND_URL
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is resolved once at startup and never reloaded
//! - All fields have defaults to allow running with no config at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BootstrapConfig, DatabaseConfig, FrontendConfig, HealthCheckConfig, ListenerConfig,
    ObservabilityConfig, ServiceConfig, TimeoutConfig,
};
