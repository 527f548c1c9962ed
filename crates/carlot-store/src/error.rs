/// Errors from listing and blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A blob path escapes its namespace or is otherwise unusable.
    #[error("invalid blob path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The backend is unavailable or in an inconsistent state.
    #[error("backend failure: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
