//! Error handling

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Errors surfaced by the pipeline.
///
/// Only the scoring boundary and dataset I/O produce errors in practice;
/// the generator, graph builder and feature extractor never fail on
/// well-typed input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed record or dataset
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unsupported protocol, feature map, scorer or out-of-range setting
    #[error("configuration error: {0}")]
    Configuration(String),

    /// External classifier unreachable or misbehaving
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
