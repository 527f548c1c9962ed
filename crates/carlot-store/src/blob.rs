use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

/// A validated, relative, `/`-separated blob path such as
/// `cars/alice/1700000000000-photo.jpg`.
///
/// Paths never start with `/`, contain no empty, `.` or `..` segments, and
/// contain no backslashes, so they cannot escape a filesystem root.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobPath(String);

impl BlobPath {
    pub fn new(path: impl Into<String>) -> StoreResult<Self> {
        let path = path.into();
        let invalid = |reason: &str| StoreError::InvalidPath {
            path: path.clone(),
            reason: reason.to_string(),
        };
        if path.is_empty() {
            return Err(invalid("empty path"));
        }
        if path.contains('\\') {
            return Err(invalid("backslash in path"));
        }
        for segment in path.split('/') {
            match segment {
                "" => return Err(invalid("empty segment")),
                "." | ".." => return Err(invalid("relative segment")),
                _ => {}
            }
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl fmt::Debug for BlobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobPath({})", self.0)
    }
}

impl fmt::Display for BlobPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct StoredBlob {
    data: Bytes,
    content_type: String,
}

/// In-memory blob store. URLs have the form `memory://<path>`.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<BlobPath, StoredBlob>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a blob's bytes and content type.
    pub fn get(&self, path: &BlobPath) -> Option<(Bytes, String)> {
        let blobs = self.blobs.read().ok()?;
        blobs
            .get(path)
            .map(|b| (b.data.clone(), b.content_type.clone()))
    }

    /// All stored paths, sorted.
    pub fn paths(&self) -> Vec<BlobPath> {
        let mut paths: Vec<BlobPath> = self
            .blobs
            .read()
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default();
        paths.sort();
        paths
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, path: &BlobPath, data: Bytes, content_type: &str) -> StoreResult<String> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        blobs.insert(
            path.clone(),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{path}"))
    }
}

impl fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_paths() {
        assert!(BlobPath::new("cars/alice/1-photo.jpg").is_ok());
        assert!(BlobPath::new("single").is_ok());
    }

    #[test]
    fn escaping_paths_rejected() {
        for bad in ["", "/abs", "cars//x", "cars/../etc", "./x", "a\\b", "trailing/"] {
            assert!(BlobPath::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn segments_split_on_slash() {
        let p = BlobPath::new("cars/alice/x.png").unwrap();
        assert_eq!(p.segments().collect::<Vec<_>>(), vec!["cars", "alice", "x.png"]);
    }

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryBlobStore::new();
        let path = BlobPath::new("cars/alice/x.png").unwrap();
        let url = store
            .put(&path, Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();
        assert_eq!(url, "memory://cars/alice/x.png");

        let (data, content_type) = store.get(&path).unwrap();
        assert_eq!(&data[..], b"png");
        assert_eq!(content_type, "image/png");
        assert_eq!(store.paths(), vec![path]);
    }

    #[tokio::test]
    async fn put_replaces_existing() {
        let store = InMemoryBlobStore::new();
        let path = BlobPath::new("a.png").unwrap();
        store.put(&path, Bytes::from_static(b"1"), "image/png").await.unwrap();
        store.put(&path, Bytes::from_static(b"2"), "image/png").await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(&store.get(&path).unwrap().0[..], b"2");
    }
}
