//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: '{value}'")]
    Env { key: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a configuration from a TOML file without validating it.
pub fn load_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` returns the value of a variable if it is set.
pub fn apply_env<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("DB_HOST") {
        config.database.host = v;
    }
    if let Some(v) = lookup("DB_PORT") {
        config.database.port = v
            .parse()
            .map_err(|_| ConfigError::Env { key: "DB_PORT", value: v })?;
    }
    if let Some(v) = lookup("DB_USER") {
        config.database.user = v;
    }
    if let Some(v) = lookup("DB_PASS") {
        config.database.password = v;
    }
    if let Some(v) = lookup("DB_NAME") {
        config.database.name = v;
    }
    if let Some(v) = lookup("BACKEND_URL") {
        config.frontend.backend_url = v;
    }
    if let Some(v) = lookup("BIND_ADDRESS") {
        config.listener.bind_address = v;
    }
    if let Some(v) = lookup("LOG_LEVEL") {
        config.observability.log_level = v;
    }
    Ok(())
}

/// Resolve the effective configuration: defaults, then the optional file,
/// then the environment. The result is validated.
pub fn load_config<F>(path: Option<&Path>, lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => ServiceConfig::default(),
    };
    apply_env(&mut config, lookup)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
