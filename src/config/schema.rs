//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the submission service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Relational store connection parameters.
    pub database: DatabaseConfig,

    /// Startup connection retry policy.
    pub bootstrap: BootstrapConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Health check settings.
    pub health: HealthCheckConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Settings shared with the separately hosted frontend.
    pub frontend: FrontendConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9191").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9191".to_string(),
        }
    }
}

/// PostgreSQL connection parameters.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database name.
    pub name: String,

    /// Maximum pooled connections shared by all request handlers.
    pub pool_max_size: usize,

    /// Timeout for establishing a single connection, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "password".to_string(),
            name: "mydb".to_string(),
            pool_max_size: 16,
            connect_timeout_secs: 5,
        }
    }
}

// Keeps the credential out of startup logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("pool_max_size", &self.pool_max_size)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// Connection retry settings used once at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Total connection attempts, including the first one.
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds.
    pub backoff_ms: u64,

    /// Double the delay after every failed attempt instead of keeping it fixed.
    pub exponential: bool,

    /// Upper bound on the delay when `exponential` is set.
    pub max_backoff_ms: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_ms: 2000,
            exponential: false,
            max_backoff_ms: 30_000,
        }
    }
}

/// Timeout configuration for request handling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Upper bound on the store ping issued by `/api/health`, in seconds.
    pub timeout_secs: u64,
}

impl HealthCheckConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self { timeout_secs: 2 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "text" or "json".
    pub log_format: String,

    /// Record request metrics and serve `/metrics`.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            metrics_enabled: true,
        }
    }
}

/// Frontend integration settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Base URL the frontend uses to reach this service.
    pub backend_url: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:9191".to_string(),
        }
    }
}
