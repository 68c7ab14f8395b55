//! Error types for the core engine.

use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while driving a design run.
///
/// Transient upstream failures (completion services, the renderer) never
/// surface here; stages absorb them into fallback artifacts or rejection
/// feedback. Only resource-exhaustion class failures abort a run.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid run configuration: {0}")]
    InvalidConfig(String),

    #[error("Publishing failed: {0}")]
    PublishFailed(String),

    #[error("No port available for the preview server: {0}")]
    NoPortAvailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
