use std::fmt;

use carlot_auth::AuthError;
use thiserror::Error;

/// The listing service operation a failure happened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    List,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Read => write!(f, "read"),
            Self::List => write!(f, "list"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Credential missing or rejected by the identity verifier.
    #[error("unauthenticated: {0}")]
    Unauthenticated(#[from] AuthError),

    /// Verified caller is not allowed to perform the operation.
    #[error("not authorized to {operation} listing")]
    Unauthorized { operation: Operation },

    /// No listing with the given id.
    #[error("listing not found: {0}")]
    NotFound(String),

    /// Store or backend failure. The reason is for logs only.
    #[error("internal error during {operation}: {reason}")]
    Internal { operation: Operation, reason: String },
}

impl ServiceError {
    pub(crate) fn internal(operation: Operation) -> impl FnOnce(carlot_store::StoreError) -> Self {
        move |e| Self::Internal {
            operation,
            reason: e.to_string(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
