use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::blob::BlobPath;
use crate::error::StoreResult;
use crate::traits::BlobStore;

/// Blob store writing files under a root directory.
///
/// The returned URL is `<public_base_url>/<path>`; serving the root
/// directory at that URL is the job of whoever deploys it (the Carlot
/// server mounts it under `/media`). Content types are not persisted.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        let base: String = public_base_url.into();
        Self {
            root: root.into(),
            public_base_url: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location of `path`.
    pub fn file_path(&self, path: &BlobPath) -> PathBuf {
        path.segments().fold(self.root.clone(), |acc, seg| acc.join(seg))
    }

    /// Public URL of `path`.
    pub fn url_for(&self, path: &BlobPath) -> String {
        format!("{}/{}", self.public_base_url, path)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, path: &BlobPath, data: Bytes, content_type: &str) -> StoreResult<String> {
        let target = self.file_path(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &data).await?;
        tracing::debug!(path = %path, bytes = data.len(), content_type, "stored blob");
        Ok(self.url_for(path))
    }
}
