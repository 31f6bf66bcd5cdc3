//! Error types for CLI utilities.

use metrics_exporter_prometheus::BuildError;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Error type for prometheus server initialization.
#[derive(Debug, Error)]
pub enum PrometheusError {
    /// Failed to bind the listener, or to build or install the exporter.
    #[error("failed to install prometheus exporter: {0}")]
    Build(#[from] BuildError),
}

/// Errors that can occur in CLI operations.
#[derive(Error, Debug)]
pub enum CliError {
    /// Error initializing metrics.
    #[error("Failed to initialize metrics: {0}")]
    MetricsInitialization(#[from] PrometheusError),

    /// Error installing the tracing subscriber.
    #[error("Failed to initialize tracing: {0}")]
    Tracing(String),

    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The config file is not valid TOML for the expected schema.
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
}

/// Type alias for CLI results.
pub type CliResult<T> = Result<T, CliError>;
