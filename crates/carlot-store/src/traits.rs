use async_trait::async_trait;
use bytes::Bytes;
use carlot_types::{ListingDocument, ListingId, ListingUpdate, NewListing, Subject};

use crate::blob::BlobPath;
use crate::error::StoreResult;

/// Document collection holding listings.
///
/// All implementations must satisfy these invariants:
/// - `create` generates the id and the creation timestamp.
/// - `update` overwrites title, description, tags and images and stamps
///   `updatedAt`; owner and creation time are never touched.
/// - `list` returns documents ordered by creation time, oldest first.
/// - Missing documents are reported as `Ok(None)` / `Ok(false)`, not errors.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Store a new listing and return its generated id.
    async fn create(&self, listing: NewListing) -> StoreResult<ListingId>;

    /// Fetch a listing by id. Returns `Ok(None)` if it does not exist.
    async fn get(&self, id: &ListingId) -> StoreResult<Option<ListingDocument>>;

    /// List every listing, or only those owned by `owner`.
    async fn list(&self, owner: Option<&Subject>) -> StoreResult<Vec<ListingDocument>>;

    /// Replace the content of a listing. Returns `false` if it does not exist.
    async fn update(&self, id: &ListingId, update: ListingUpdate) -> StoreResult<bool>;

    /// Remove a listing. Returns `true` if it existed.
    async fn delete(&self, id: &ListingId) -> StoreResult<bool>;
}

/// Binary object store for listing images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` at `path`, replacing anything already there, and return
    /// a URL the object can be fetched from.
    async fn put(&self, path: &BlobPath, data: Bytes, content_type: &str) -> StoreResult<String>;
}

/// Order documents oldest first, breaking ties by id.
pub(crate) fn sort_by_creation(docs: &mut [ListingDocument]) {
    docs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}
