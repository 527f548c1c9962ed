//! Keyed-BLAKE3 signed bearer tokens.
//!
//! A token has three dot-separated fields:
//!
//! ```text
//! <subject>.<issued_at_unix_secs>.<hex mac>
//! ```
//!
//! The MAC is `blake3::keyed_hash(key, "carlot-token-v1:" || subject || "." || issued_at)`.
//! Subjects cannot contain `.`, so splitting is unambiguous.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use carlot_types::Subject;
use chrono::Utc;

use crate::error::{AuthError, AuthResult};
use crate::verifier::IdentityVerifier;

const DOMAIN: &[u8] = b"carlot-token-v1:";

/// 32-byte secret shared by a [`TokenIssuer`] and a [`SignedTokenVerifier`].
#[derive(Clone, PartialEq, Eq)]
pub struct TokenKey([u8; 32]);

impl TokenKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self(rand::random())
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(s: &str) -> AuthResult<Self> {
        let bytes = hex::decode(s.trim()).map_err(|e| AuthError::InvalidKey(e.to_string()))?;
        let arr: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            AuthError::InvalidKey(format!("expected 32 bytes, got {}", b.len()))
        })?;
        Ok(Self(arr))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    fn mac(&self, subject: &str, issued_at: i64) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new_keyed(&self.0);
        hasher.update(DOMAIN);
        hasher.update(subject.as_bytes());
        hasher.update(b".");
        hasher.update(issued_at.to_string().as_bytes());
        hasher.finalize()
    }
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenKey(<redacted>)")
    }
}

/// Mints signed tokens.
#[derive(Clone, Debug)]
pub struct TokenIssuer {
    key: TokenKey,
}

impl TokenIssuer {
    pub fn new(key: TokenKey) -> Self {
        Self { key }
    }

    /// Issue a token for `subject` stamped with the current time.
    pub fn issue(&self, subject: &Subject) -> String {
        self.issue_at(subject, Utc::now().timestamp())
    }

    pub fn issue_at(&self, subject: &Subject, issued_at: i64) -> String {
        let mac = self.key.mac(subject.as_str(), issued_at);
        format!("{}.{}.{}", subject, issued_at, mac.to_hex())
    }
}

/// Verifies tokens minted by a [`TokenIssuer`] with the same key.
#[derive(Clone, Debug)]
pub struct SignedTokenVerifier {
    key: TokenKey,
    max_age: Option<Duration>,
}

impl SignedTokenVerifier {
    pub fn new(key: TokenKey) -> Self {
        Self { key, max_age: None }
    }

    /// Reject tokens older than `max_age`.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Verify `token` as of the unix time `now`.
    pub fn verify_at(&self, token: &str, now: i64) -> AuthResult<Subject> {
        let mut parts = token.split('.');
        let (Some(subject), Some(issued_at), Some(mac), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::Malformed("expected three fields".into()));
        };

        let raw_issued_at = issued_at;
        let issued_at: i64 = raw_issued_at
            .parse()
            .map_err(|_| AuthError::Malformed("issued-at is not an integer".into()))?;
        // The MAC covers the canonical rendering; `+42` or `042` must not
        // pass as `42`.
        if issued_at.to_string() != raw_issued_at {
            return Err(AuthError::Malformed("issued-at is not canonical".into()));
        }
        let presented = blake3::Hash::from_hex(mac)
            .map_err(|e| AuthError::Malformed(format!("mac: {e}")))?;

        // blake3::Hash equality is constant-time.
        if presented != self.key.mac(subject, issued_at) {
            return Err(AuthError::BadSignature);
        }

        if let Some(max_age) = self.max_age {
            let age = now.saturating_sub(issued_at);
            if age < 0 || age as u64 > max_age.as_secs() {
                return Err(AuthError::Expired { issued_at });
            }
        }

        Ok(Subject::new(subject)?)
    }
}

#[async_trait]
impl IdentityVerifier for SignedTokenVerifier {
    async fn verify(&self, token: &str) -> AuthResult<Subject> {
        let result = self.verify_at(token, Utc::now().timestamp());
        if let Err(e) = &result {
            tracing::debug!(error = %e, "token rejected");
        }
        result
    }
}
