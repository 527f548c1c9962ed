use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use carlot_service::{Operation, ServiceError};
use serde_json::json;
use thiserror::Error;

/// Errors raised while configuring or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("auth error: {0}")]
    Auth(#[from] carlot_auth::AuthError),

    #[error("store error: {0}")]
    Store(#[from] carlot_store::StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// An HTTP error response: a status and a `{"error": "..."}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    const fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    /// An authenticated request whose body could not be decoded. Reported
    /// like any other failure of `operation`.
    pub fn invalid_body(operation: Operation, rejection: &JsonRejection) -> Self {
        tracing::warn!(%operation, reason = %rejection.body_text(), "request body rejected");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            Self::failure_message(operation),
        )
    }

    fn failure_message(operation: Operation) -> &'static str {
        match operation {
            Operation::Create => "Failed to create car",
            Operation::Read => "Failed to fetch car",
            Operation::List => "Failed to fetch cars",
            Operation::Update => "Failed to update car",
            Operation::Delete => "Failed to delete car",
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthenticated(_) => Self::new(StatusCode::UNAUTHORIZED, "Unauthorized"),
            // Owner spoofing on create is reported as 401, not 403.
            ServiceError::Unauthorized {
                operation: Operation::Create,
            } => Self::new(StatusCode::UNAUTHORIZED, "Unauthorized"),
            ServiceError::Unauthorized {
                operation: Operation::Update,
            } => Self::new(StatusCode::FORBIDDEN, "Not authorized to edit this car"),
            ServiceError::Unauthorized {
                operation: Operation::Delete,
            } => Self::new(StatusCode::FORBIDDEN, "Not authorized to delete this car"),
            ServiceError::Unauthorized { .. } => Self::new(StatusCode::FORBIDDEN, "Forbidden"),
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Car not found"),
            ServiceError::Internal { operation, reason } => {
                tracing::error!(%operation, %reason, "request failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Self::failure_message(operation),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
