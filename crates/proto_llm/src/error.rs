//! Error types for the completion client.

use thiserror::Error;

/// Result type alias for completion operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors from the completion service.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Completion service not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Completion API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse completion response: {0}")]
    Parse(String),

    #[error("Completion response contained no content")]
    EmptyResponse,

    #[error("Retries exhausted: {0}")]
    RetriesExhausted(String),
}
