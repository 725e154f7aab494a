use std::io;

use thiserror::Error;

/// Result type used across the timeline crates.
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Canonical error representation shared by the service layers.
#[derive(Debug, Error)]
pub enum TimelineError {
    /// Connection, transport or query-execution failure in the backing store.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    /// A write that should have touched exactly one row touched none.
    #[error("no rows affected: {0}")]
    NoRowsAffected(String),

    /// Schema DDL failed to run; fatal to startup.
    #[error("schema provisioning failed: {0}")]
    SchemaProvisionFailure(String),

    #[error("i/o error: {0}")]
    IoError(#[from] io::Error),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("transport error: {0}")]
    TransportError(String),
}

impl TimelineError {
    /// Whether the error maps to a "not found"-style condition for callers.
    pub fn is_no_rows(&self) -> bool {
        matches!(self, TimelineError::NoRowsAffected(_))
    }
}

impl From<serde_json::Error> for TimelineError {
    fn from(err: serde_json::Error) -> Self {
        TimelineError::SerializationError(err.to_string())
    }
}

impl From<axum::Error> for TimelineError {
    fn from(err: axum::Error) -> Self {
        TimelineError::TransportError(err.to_string())
    }
}

/// Dedicated configuration error used by the configuration module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {key}: {source}")]
    InvalidEnvVar {
        key: &'static str,
        #[source]
        source: std::env::VarError,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ConfigError> for TimelineError {
    fn from(value: ConfigError) -> Self {
        TimelineError::ConfigError(value.to_string())
    }
}
