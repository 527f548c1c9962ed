use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use carlot_types::{ListingDocument, ListingId, ListingUpdate, NewListing, Subject};
use chrono::Utc;

use crate::error::{StoreError, StoreResult};
use crate::traits::{sort_by_creation, ListingStore};

/// In-memory, HashMap-based listing store.
///
/// Intended for tests and embedding. Documents are held behind a `RwLock`
/// and cloned on read/write. Data is lost when the store is dropped.
pub struct InMemoryListingStore {
    docs: RwLock<HashMap<ListingId, ListingDocument>>,
}

impl InMemoryListingStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store pre-populated with documents.
    pub fn with_documents(docs: impl IntoIterator<Item = ListingDocument>) -> Self {
        let map = docs.into_iter().map(|doc| (doc.id.clone(), doc)).collect();
        Self {
            docs: RwLock::new(map),
        }
    }

    /// Number of listings currently stored.
    pub fn len(&self) -> usize {
        self.docs.read().map(|docs| docs.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
        StoreError::Backend(format!("lock poisoned: {e}"))
    }
}

impl Default for InMemoryListingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn create(&self, listing: NewListing) -> StoreResult<ListingId> {
        let id = ListingId::generate();
        let doc = ListingDocument::from_new(id.clone(), listing, Utc::now());
        self.docs
            .write()
            .map_err(Self::poisoned)?
            .insert(id.clone(), doc);
        Ok(id)
    }

    async fn get(&self, id: &ListingId) -> StoreResult<Option<ListingDocument>> {
        let docs = self.docs.read().map_err(Self::poisoned)?;
        Ok(docs.get(id).cloned())
    }

    async fn list(&self, owner: Option<&Subject>) -> StoreResult<Vec<ListingDocument>> {
        let docs = self.docs.read().map_err(Self::poisoned)?;
        let mut selected: Vec<ListingDocument> = docs
            .values()
            .filter(|doc| owner.map_or(true, |o| &doc.owner_id == o))
            .cloned()
            .collect();
        sort_by_creation(&mut selected);
        Ok(selected)
    }

    async fn update(&self, id: &ListingId, update: ListingUpdate) -> StoreResult<bool> {
        let mut docs = self.docs.write().map_err(Self::poisoned)?;
        match docs.get_mut(id) {
            Some(doc) => {
                doc.apply_update(update, Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ListingId) -> StoreResult<bool> {
        let mut docs = self.docs.write().map_err(Self::poisoned)?;
        Ok(docs.remove(id).is_some())
    }
}

impl std::fmt::Debug for InMemoryListingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryListingStore")
            .field("listing_count", &self.len())
            .finish()
    }
}
