//! Error types for the narrative layer.

use thiserror::Error;

/// Result type for narrative operations.
pub type NarrativeResult<T> = Result<T, NarrativeError>;

/// Errors raised while emitting telemetry.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// Writing to a sink failed.
    #[error("telemetry sink error: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot could not be encoded.
    #[error("telemetry encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
