use std::path::{Path, PathBuf};

use carlot_auth::Credentials;
use carlot_types::{Listing, Subject};

use crate::error::{SdkError, SdkResult};

/// Environment variable that overrides the stored session token.
pub const TOKEN_ENV: &str = "CARLOT_TOKEN";

/// The signed-in user: a bearer token and the subject it was issued for.
///
/// The subject is read from the token's first field without checking the
/// signature. It is only used to pick "my listings" and to decide which
/// actions to offer; the server verifies the token on every call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    token: String,
    subject: Subject,
}

impl Session {
    pub fn from_token(token: impl Into<String>) -> SdkResult<Self> {
        let token = token.into().trim().to_string();
        let subject = token
            .split('.')
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SdkError::InvalidInput("token has no subject".into()))?;
        let subject =
            Subject::new(subject).map_err(|e| SdkError::InvalidInput(format!("token subject: {e}")))?;
        Ok(Self { token, subject })
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::Bearer(self.token.clone())
    }

    /// Whether edit/delete should be offered for `listing`.
    pub fn owns(&self, listing: &Listing) -> bool {
        listing.is_owned_by(&self.subject)
    }

    /// `<config dir>/carlot/session`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("carlot").join("session"))
    }

    /// Read a stored session. A missing file means nobody is signed in.
    pub fn load(path: &Path) -> SdkResult<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => Self::from_token(raw).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve the current session: `CARLOT_TOKEN` first, then `path`.
    pub fn resolve(path: Option<&Path>) -> SdkResult<Option<Self>> {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                return Self::from_token(token).map(Some);
            }
        }
        match path {
            Some(path) => Self::load(path),
            None => Ok(None),
        }
    }

    pub fn save(&self, path: &Path) -> SdkResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.token)?;
        Ok(())
    }

    /// Forget the stored session. Returns `true` if one existed.
    pub fn clear(path: &Path) -> SdkResult<bool> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
