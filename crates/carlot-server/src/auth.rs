use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use carlot_auth::Credentials;

/// Extracts the bearer credential from the `Authorization` header.
///
/// Never rejects: a missing or malformed header yields
/// [`Credentials::Anonymous`] and the listing service decides what that means.
pub struct Bearer(pub Credentials);

#[async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        Ok(Self(Credentials::from_authorization(header)))
    }
}
