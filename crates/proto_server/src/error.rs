//! Error types for the preview server and publishing.

use std::path::PathBuf;

use thiserror::Error;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("No free port in {start}..{end} and the ephemeral bind failed: {reason}")]
    NoPortAvailable {
        start: u16,
        end: u16,
        reason: String,
    },

    #[error("Cannot publish an empty artifact")]
    EmptyArtifact,

    #[error("Artifact failed the document check: {0}")]
    InvalidArtifact(String),

    #[error("Refusing to overwrite existing prototype at {0}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ServerError> for proto_core::EngineError {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::NoPortAvailable { .. } => {
                proto_core::EngineError::NoPortAvailable(err.to_string())
            }
            other => proto_core::EngineError::PublishFailed(other.to_string()),
        }
    }
}
