use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    /// The API answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("You must be logged in to {0}")]
    NotLoggedIn(&'static str),

    #[error("{0}")]
    InvalidInput(String),

    /// An image upload failed. `uploaded` holds the URLs already stored
    /// before the failure; they are not cleaned up.
    #[error("Failed to upload {file}: {reason}")]
    Upload {
        file: String,
        reason: String,
        uploaded: Vec<String>,
    },

    #[error("store error: {0}")]
    Store(#[from] carlot_store::StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SdkError {
    /// HTTP status of an API failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
