use std::sync::Arc;

use carlot_store::{BlobPath, BlobStore};
use carlot_types::Subject;
use chrono::Utc;
use futures::stream::{self, StreamExt};

use crate::error::{SdkError, SdkResult};
use crate::picker::CandidateImage;

/// Replace every character outside `[A-Za-z0-9.]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect()
}

/// Object path for an uploaded image: `cars/<subject>/<millis>-<sanitized name>`.
pub fn object_path(subject: &Subject, file_name: &str, millis: i64) -> SdkResult<BlobPath> {
    let path = format!("cars/{}/{}-{}", subject, millis, sanitize_file_name(file_name));
    Ok(BlobPath::new(path)?)
}

/// Uploads picked images to a blob store.
///
/// With the default concurrency of 1, images go up strictly one after
/// another. A higher limit fans uploads out; URLs are still returned in
/// selection order. The first failure aborts the batch, and images stored
/// before it stay in the store.
#[derive(Clone)]
pub struct Uploader {
    store: Arc<dyn BlobStore>,
    concurrency: usize,
}

impl Uploader {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            concurrency: 1,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    async fn upload_one(
        &self,
        subject: &Subject,
        image: &CandidateImage,
        millis: i64,
    ) -> Result<String, String> {
        let path = object_path(subject, &image.name, millis).map_err(|e| e.to_string())?;
        let data = image.read().await.map_err(|e| e.to_string())?;
        self.store
            .put(&path, data, &image.content_type)
            .await
            .map_err(|e| e.to_string())
    }

    /// Upload `images` under `subject`'s namespace and return their URLs.
    ///
    /// Each image's timestamp is the batch start time plus its position, so
    /// two files with the same name never share a path.
    pub async fn upload_all(
        &self,
        subject: &Subject,
        images: &[CandidateImage],
    ) -> SdkResult<Vec<String>> {
        let started = Utc::now().timestamp_millis();
        let mut results = stream::iter(images.iter().enumerate())
            .map(|(i, image)| async move {
                let outcome = self.upload_one(subject, image, started + i as i64).await;
                (image, outcome)
            })
            .buffered(self.concurrency);

        let mut uploaded = Vec::with_capacity(images.len());
        while let Some((image, outcome)) = results.next().await {
            match outcome {
                Ok(url) => {
                    tracing::debug!(file = %image.name, %url, "image uploaded");
                    uploaded.push(url);
                }
                Err(reason) => {
                    tracing::warn!(
                        file = %image.name,
                        %reason,
                        orphaned = uploaded.len(),
                        "image upload failed"
                    );
                    return Err(SdkError::Upload {
                        file: image.name.clone(),
                        reason,
                        uploaded,
                    });
                }
            }
        }
        Ok(uploaded)
    }
}

impl std::fmt::Debug for Uploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uploader")
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use carlot_store::{InMemoryBlobStore, StoreError, StoreResult};
    use proptest::prelude::*;

    fn alice() -> Subject {
        Subject::new("alice").unwrap()
    }

    fn image(name: &str) -> CandidateImage {
        CandidateImage::from_bytes(name, "image/png", Bytes::from(name.as_bytes().to_vec()))
    }

    #[test]
    fn sanitizes_special_characters() {
        assert_eq!(sanitize_file_name("my car (1).jpg"), "my_car__1_.jpg");
        assert_eq!(sanitize_file_name("plain.png"), "plain.png");
        assert_eq!(sanitize_file_name("ünï.png"), "_n_.png");
    }

    #[test]
    fn object_path_is_namespaced_by_subject() {
        let path = object_path(&alice(), "red car.png", 1_700_000_000_000).unwrap();
        assert_eq!(path.as_str(), "cars/alice/1700000000000-red_car.png");
    }

    #[test]
    fn object_path_cannot_escape() {
        let path = object_path(&alice(), "../../etc/passwd", 1).unwrap();
        assert_eq!(path.as_str(), "cars/alice/1-.._.._etc_passwd");
        assert_eq!(path.segments().count(), 3);
    }

    #[tokio::test]
    async fn sequential_upload_returns_urls_in_order() {
        let store = Arc::new(InMemoryBlobStore::new());
        let uploader = Uploader::new(store.clone());
        assert_eq!(uploader.concurrency(), 1);

        let urls = uploader
            .upload_all(&alice(), &[image("a.png"), image("b.png")])
            .await
            .unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls[0].starts_with("memory://cars/alice/") && urls[0].ends_with("-a.png"));
        assert!(urls[1].ends_with("-b.png"));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn same_name_gets_distinct_paths() {
        let store = Arc::new(InMemoryBlobStore::new());
        let urls = Uploader::new(store.clone())
            .upload_all(&alice(), &[image("x.png"), image("x.png")])
            .await
            .unwrap();
        assert_ne!(urls[0], urls[1]);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn concurrent_upload_keeps_selection_order() {
        let store = Arc::new(InMemoryBlobStore::new());
        let images: Vec<_> = (0..6).map(|i| image(&format!("{i}.png"))).collect();
        let urls = Uploader::new(store)
            .with_concurrency(3)
            .upload_all(&alice(), &images)
            .await
            .unwrap();
        for (i, url) in urls.iter().enumerate() {
            assert!(url.ends_with(&format!("-{i}.png")), "{url} out of order");
        }
    }

    #[tokio::test]
    async fn empty_selection_uploads_nothing() {
        let store = Arc::new(InMemoryBlobStore::new());
        let urls = Uploader::new(store.clone()).upload_all(&alice(), &[]).await.unwrap();
        assert!(urls.is_empty());
        assert!(store.is_empty());
    }

    /// Fails for any file whose name contains "bad".
    struct PickyStore(InMemoryBlobStore);

    #[async_trait]
    impl BlobStore for PickyStore {
        async fn put(&self, path: &BlobPath, data: Bytes, content_type: &str) -> StoreResult<String> {
            if path.as_str().contains("bad") {
                return Err(StoreError::Backend("quota exceeded".into()));
            }
            self.0.put(path, data, content_type).await
        }
    }

    #[tokio::test]
    async fn failure_aborts_and_reports_orphans() {
        let store = Arc::new(PickyStore(InMemoryBlobStore::new()));
        let err = Uploader::new(store.clone())
            .upload_all(&alice(), &[image("good.png"), image("bad.png"), image("later.png")])
            .await
            .unwrap_err();
        match err {
            SdkError::Upload { file, uploaded, reason } => {
                assert_eq!(file, "bad.png");
                assert_eq!(uploaded.len(), 1);
                assert!(reason.contains("quota exceeded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // The image stored before the failure is left behind.
        assert_eq!(store.0.len(), 1);
    }

    proptest! {
        #[test]
        fn sanitized_names_use_safe_alphabet(name in ".{0,40}") {
            let clean = sanitize_file_name(&name);
            prop_assert!(clean.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_'));
            prop_assert_eq!(clean.chars().count(), name.chars().count());
        }
    }
}
