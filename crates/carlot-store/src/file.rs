use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use carlot_types::{ListingDocument, ListingId, ListingUpdate, NewListing, Subject};
use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::StoreResult;
use crate::traits::{sort_by_creation, ListingStore};

type Docs = HashMap<ListingId, ListingDocument>;

/// Listing store persisted as a single JSON array on disk.
///
/// The whole collection is kept in memory and rewritten after every
/// mutation (write to a sibling temp file, then rename). A mutation only
/// becomes visible once it has been persisted.
pub struct JsonFileListingStore {
    path: PathBuf,
    docs: Mutex<Docs>,
}

impl JsonFileListingStore {
    /// Open the store at `path`, loading existing listings if the file exists.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let docs = match tokio::fs::read(&path).await {
            Ok(raw) => {
                let list: Vec<ListingDocument> = serde_json::from_slice(&raw)?;
                list.into_iter().map(|doc| (doc.id.clone(), doc)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Docs::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::info!(path = %path.display(), listings = docs.len(), "opened listing file");
        Ok(Self {
            path,
            docs: Mutex::new(docs),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, docs: &Docs) -> StoreResult<()> {
        let mut list: Vec<ListingDocument> = docs.values().cloned().collect();
        sort_by_creation(&mut list);
        let raw = serde_json::to_vec_pretty(&list)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, raw).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Apply `mutate` to a copy of the collection, persist it, then publish it.
    async fn commit<T>(&self, mutate: impl FnOnce(&mut Docs) -> T) -> StoreResult<T> {
        let mut docs = self.docs.lock().await;
        let mut next = docs.clone();
        let out = mutate(&mut next);
        self.persist(&next).await?;
        *docs = next;
        Ok(out)
    }
}

#[async_trait]
impl ListingStore for JsonFileListingStore {
    async fn create(&self, listing: NewListing) -> StoreResult<ListingId> {
        let id = ListingId::generate();
        let doc = ListingDocument::from_new(id.clone(), listing, Utc::now());
        self.commit(|docs| docs.insert(id.clone(), doc)).await?;
        Ok(id)
    }

    async fn get(&self, id: &ListingId) -> StoreResult<Option<ListingDocument>> {
        Ok(self.docs.lock().await.get(id).cloned())
    }

    async fn list(&self, owner: Option<&Subject>) -> StoreResult<Vec<ListingDocument>> {
        let docs = self.docs.lock().await;
        let mut selected: Vec<ListingDocument> = docs
            .values()
            .filter(|doc| owner.map_or(true, |o| &doc.owner_id == o))
            .cloned()
            .collect();
        sort_by_creation(&mut selected);
        Ok(selected)
    }

    async fn update(&self, id: &ListingId, update: ListingUpdate) -> StoreResult<bool> {
        if !self.docs.lock().await.contains_key(id) {
            return Ok(false);
        }
        self.commit(|docs| match docs.get_mut(id) {
            Some(doc) => {
                doc.apply_update(update, Utc::now());
                true
            }
            None => false,
        })
        .await
    }

    async fn delete(&self, id: &ListingId) -> StoreResult<bool> {
        if !self.docs.lock().await.contains_key(id) {
            return Ok(false);
        }
        self.commit(|docs| docs.remove(id).is_some()).await
    }
}

impl std::fmt::Debug for JsonFileListingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileListingStore")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_listing(title: &str) -> NewListing {
        NewListing {
            title: title.into(),
            description: "desc".into(),
            tags: vec!["suv".into()],
            images: vec!["https://img/1".into()],
            owner_id: Subject::new("alice").unwrap(),
        }
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileListingStore::open(dir.path().join("cars.json"))
            .await
            .unwrap();
        assert!(store.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listings_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("cars.json");

        let id = {
            let store = JsonFileListingStore::open(&path).await.unwrap();
            let id = store.create(new_listing("Persisted")).await.unwrap();
            store.create(new_listing("Second")).await.unwrap();
            id
        };

        let reopened = JsonFileListingStore::open(&path).await.unwrap();
        let doc = reopened.get(&id).await.unwrap().expect("persisted");
        assert_eq!(doc.title.as_deref(), Some("Persisted"));
        assert_eq!(reopened.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_and_delete_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.json");
        let store = JsonFileListingStore::open(&path).await.unwrap();
        let keep = store.create(new_listing("Keep")).await.unwrap();
        let gone = store.create(new_listing("Drop")).await.unwrap();

        let update = ListingUpdate {
            title: "Kept".into(),
            ..Default::default()
        };
        assert!(store.update(&keep, update).await.unwrap());
        assert!(store.delete(&gone).await.unwrap());
        assert!(!store.delete(&gone).await.unwrap());

        let reopened = JsonFileListingStore::open(&path).await.unwrap();
        let all = reopened.list(None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title.as_deref(), Some("Kept"));
        assert!(all[0].updated_at.is_some());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.json");
        tokio::fs::write(&path, b"not json").await.unwrap();
        assert!(JsonFileListingStore::open(&path).await.is_err());
    }

    #[tokio::test]
    async fn update_missing_does_not_touch_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.json");
        let store = JsonFileListingStore::open(&path).await.unwrap();
        let id = ListingId::new("ghost").unwrap();
        assert!(!store.update(&id, ListingUpdate::default()).await.unwrap());
        assert!(!path.exists());
    }
}
