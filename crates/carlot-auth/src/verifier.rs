use std::collections::HashMap;

use async_trait::async_trait;
use carlot_types::Subject;

use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};

/// Turns a bearer token into a verified subject.
///
/// Implementations may call out to a remote identity platform, so the
/// operation is async. A verifier never sees anonymous requests; use
/// [`authenticate`] to handle those uniformly.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> AuthResult<Subject>;
}

/// Verify `credentials`, failing with [`AuthError::MissingCredential`] for
/// anonymous callers.
pub async fn authenticate(
    verifier: &dyn IdentityVerifier,
    credentials: &Credentials,
) -> AuthResult<Subject> {
    match credentials {
        Credentials::Bearer(token) => verifier.verify(token).await,
        Credentials::Anonymous => Err(AuthError::MissingCredential),
    }
}

/// Verifier backed by a fixed token → subject table.
#[derive(Debug, Default)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Subject>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `token` as a credential for `subject`.
    pub fn with_token(mut self, token: impl Into<String>, subject: Subject) -> Self {
        self.tokens.insert(token.into(), subject);
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> AuthResult<Subject> {
        self.tokens.get(token).cloned().ok_or(AuthError::UnknownToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> StaticTokenVerifier {
        StaticTokenVerifier::new().with_token("alice-token", Subject::new("alice").unwrap())
    }

    #[tokio::test]
    async fn known_token_verifies() {
        let subject = verifier().verify("alice-token").await.unwrap();
        assert_eq!(subject.as_str(), "alice");
    }

    #[tokio::test]
    async fn unknown_token_rejected() {
        assert_eq!(
            verifier().verify("nope").await,
            Err(AuthError::UnknownToken)
        );
    }

    #[tokio::test]
    async fn anonymous_is_missing_credential() {
        let v = verifier();
        assert_eq!(
            authenticate(&v, &Credentials::Anonymous).await,
            Err(AuthError::MissingCredential)
        );
    }

    #[tokio::test]
    async fn bearer_goes_through_verifier() {
        let v = verifier();
        let subject = authenticate(&v, &Credentials::Bearer("alice-token".into()))
            .await
            .unwrap();
        assert_eq!(subject.as_str(), "alice");
    }
}
