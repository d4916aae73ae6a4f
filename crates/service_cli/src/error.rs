//! CLI error types

use service_api::{ApiError, ConfigError};
use thiserror::Error;

/// CLI result type
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors reported by the `regrisk` binary
#[derive(Error, Debug)]
pub enum CliError {
    /// Engine rejected the input
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Reading input or writing output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input is not valid JSON for the expected record
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV output failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
