//! Identity verification for Carlot.
//!
//! The listing service never decides who a caller is. It hands the bearer
//! credential from the `Authorization` header to an [`IdentityVerifier`] and
//! gets back a verified [`Subject`](carlot_types::Subject) or a failure.
//!
//! # Backends
//!
//! - [`SignedTokenVerifier`]: checks tokens minted by a [`TokenIssuer`]
//!   sharing the same [`TokenKey`] (keyed BLAKE3 MAC)
//! - [`StaticTokenVerifier`]: fixed token table for tests and demos

pub mod credentials;
pub mod error;
pub mod token;
pub mod verifier;

pub use credentials::Credentials;
pub use error::{AuthError, AuthResult};
pub use token::{SignedTokenVerifier, TokenIssuer, TokenKey};
pub use verifier::{authenticate, IdentityVerifier, StaticTokenVerifier};
