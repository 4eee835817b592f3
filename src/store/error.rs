//! Artifact store error types.

/// Errors that can occur during artifact store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Artifact not found: {name}")]
    NotFound { name: String },

    #[error("Invalid artifact name: {name}")]
    InvalidName { name: String },

    #[error("Artifact payload is empty")]
    EmptyPayload,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
