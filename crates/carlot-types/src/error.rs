use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("subject contains a reserved character: {0:?}")]
    ReservedCharacter(char),
}
