//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid, attempts >= 1)
//! - Check that addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Check a configuration, collecting every error found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let db = &config.database;
    for (field, value) in [
        ("database.host", &db.host),
        ("database.user", &db.user),
        ("database.name", &db.name),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, "must not be empty"));
        }
    }
    if db.port == 0 {
        errors.push(ValidationError::new("database.port", "must be non-zero"));
    }
    if db.pool_max_size == 0 {
        errors.push(ValidationError::new("database.pool_max_size", "must be at least 1"));
    }
    if db.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("database.connect_timeout_secs", "must be positive"));
    }

    if config.bootstrap.max_attempts == 0 {
        errors.push(ValidationError::new("bootstrap.max_attempts", "must be at least 1"));
    }
    if config.bootstrap.exponential && config.bootstrap.max_backoff_ms < config.bootstrap.backoff_ms {
        errors.push(ValidationError::new(
            "bootstrap.max_backoff_ms",
            "must not be smaller than bootstrap.backoff_ms",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be positive"));
    }
    if config.health.timeout_secs == 0 {
        errors.push(ValidationError::new("health.timeout_secs", "must be positive"));
    }

    match config.observability.log_format.as_str() {
        "text" | "json" => {}
        other => errors.push(ValidationError::new(
            "observability.log_format",
            format!("expected 'text' or 'json', got '{}'", other),
        )),
    }

    if let Err(e) = url::Url::parse(&config.frontend.backend_url) {
        errors.push(ValidationError::new("frontend.backend_url", e.to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
