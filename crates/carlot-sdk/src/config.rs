use std::path::{Path, PathBuf};
use std::sync::Arc;

use carlot_store::{BlobStore, FsBlobStore};
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Where the client talks to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the Carlot API.
    pub api_url: String,
    /// Directory images are uploaded into.
    pub media_root: PathBuf,
    /// Public URL at which `media_root` is served.
    pub media_base_url: String,
    /// Maximum simultaneous image uploads. 1 uploads one at a time.
    pub upload_concurrency: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:3000".into(),
            media_root: PathBuf::from("media"),
            media_base_url: "http://127.0.0.1:3000/media".into(),
            upload_concurrency: 1,
        }
    }
}

impl ClientConfig {
    /// `<config dir>/carlot/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("carlot").join("config.toml"))
    }

    pub fn from_toml(raw: &str) -> SdkResult<Self> {
        toml::from_str(raw).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> SdkResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// The blob store images are uploaded to.
    pub fn blob_store(&self) -> Arc<dyn BlobStore> {
        Arc::new(FsBlobStore::new(&self.media_root, &self.media_base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_upload_sequentially() {
        let c = ClientConfig::default();
        assert_eq!(c.upload_concurrency, 1);
        assert_eq!(c.api_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn partial_toml() {
        let c = ClientConfig::from_toml(r#"api_url = "https://cars.example""#).unwrap();
        assert_eq!(c.api_url, "https://cars.example");
        assert_eq!(c.media_root, PathBuf::from("media"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = ClientConfig::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(c, ClientConfig::default());
    }
}
