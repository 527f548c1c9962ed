use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use carlot_auth::TokenKey;
use carlot_service::ReadPolicy;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// JSON file holding listings. Listings live in memory when unset.
    pub data_file: Option<PathBuf>,
    /// Directory served under `/media`. Disabled when unset. Clients
    /// upload into it and publish URLs under their own `media_base_url`.
    pub media_root: Option<PathBuf>,
    /// Hex-encoded 32-byte key for bearer token signatures.
    pub token_secret: Option<String>,
    pub token_max_age_secs: Option<u64>,
    pub allow_anonymous_read: bool,
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_file: None,
            media_root: None,
            token_secret: None,
            token_max_age_secs: None,
            allow_anonymous_read: false,
            cors_permissive: false,
        }
    }
}

impl ServerConfig {
    /// Load a TOML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> ServerResult<Self> {
        toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn token_key(&self) -> ServerResult<TokenKey> {
        let secret = self
            .token_secret
            .as_deref()
            .ok_or_else(|| ServerError::Config("token_secret is not set".into()))?;
        Ok(TokenKey::from_hex(secret)?)
    }

    pub fn token_max_age(&self) -> Option<Duration> {
        self.token_max_age_secs.map(Duration::from_secs)
    }

    pub fn read_policy(&self) -> ReadPolicy {
        if self.allow_anonymous_read {
            ReadPolicy::AllowAnonymous
        } else {
            ReadPolicy::RequireCredential
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert!(c.data_file.is_none());
        assert!(!c.allow_anonymous_read);
        assert_eq!(c.read_policy(), ReadPolicy::RequireCredential);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let c = ServerConfig::from_toml(
            r#"
            bind_addr = "0.0.0.0:8080"
            allow_anonymous_read = true
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(c.read_policy(), ReadPolicy::AllowAnonymous);
        assert!(!c.cors_permissive);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let c = ServerConfig::from_toml(
            r#"
            public_base_url = "https://cars.example"
            media_root = "media"
            "#,
        )
        .unwrap();
        assert_eq!(c.media_root, Some(PathBuf::from("media")));
    }

    #[test]
    fn bad_toml_is_config_error() {
        assert!(matches!(
            ServerConfig::from_toml("bind_addr = 12"),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn token_key_requires_secret() {
        let mut c = ServerConfig::default();
        assert!(matches!(c.token_key(), Err(ServerError::Config(_))));
        c.token_secret = Some("11".repeat(32));
        assert!(c.token_key().is_ok());
        c.token_secret = Some("11".into());
        assert!(matches!(c.token_key(), Err(ServerError::Auth(_))));
    }
}
