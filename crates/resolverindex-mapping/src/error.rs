//! Error types for the mapping layer.

use resolverindex_core::error::StoreError;
use thiserror::Error;

/// Errors that abort handling of a single event.
///
/// Call-data problems are not among them: an undecodable text value is
/// recorded as such rather than failing the event.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors raised while loading a [`MappingConfig`](crate::config::MappingConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid contract address '{address}': expected 0x followed by 40 hex digits")]
    InvalidContract { address: String },

    #[error("Invalid log level '{level}' for '{component}'")]
    InvalidLogLevel { component: String, level: String },
}
