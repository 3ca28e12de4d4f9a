//! Error types for Synheart Vigil

use thiserror::Error;

/// Errors that can occur during computation
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Unknown function: {0}")]
    UnknownStatistic(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Failed to parse record: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
