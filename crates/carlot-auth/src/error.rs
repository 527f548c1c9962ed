use thiserror::Error;

/// Reasons a credential could not be turned into a verified subject.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("no bearer credential supplied")]
    MissingCredential,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token expired (issued at {issued_at})")]
    Expired { issued_at: i64 },

    #[error("unknown token")]
    UnknownToken,

    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("invalid subject: {0}")]
    Subject(#[from] carlot_types::TypeError),
}

pub type AuthResult<T> = Result<T, AuthError>;
