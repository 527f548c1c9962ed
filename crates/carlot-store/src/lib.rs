//! Storage backends for Carlot.
//!
//! Two seams live here, both consumed by higher layers through trait
//! objects so that a hosted document database or bucket can be slotted in
//! without touching the listing service:
//!
//! - [`ListingStore`]: document collection of listings keyed by
//!   store-generated ids
//! - [`BlobStore`]: named binary objects (listing photos) that come back as
//!   retrievable URLs
//!
//! # Backends
//!
//! - [`InMemoryListingStore`] / [`InMemoryBlobStore`]: `HashMap`-based, for
//!   tests and embedding
//! - [`JsonFileListingStore`]: whole collection persisted to one JSON file
//! - [`FsBlobStore`]: blobs written under a directory and served from a
//!   public base URL
//!
//! # Design Rules
//!
//! 1. Ids and timestamps are assigned by the store, never by callers.
//! 2. A single-document write is atomic; there are no multi-document
//!    transactions.
//! 3. Stores do not enforce ownership. That is the listing service's job.

pub mod blob;
pub mod error;
pub mod file;
pub mod fs_blob;
pub mod memory;
pub mod traits;

pub use blob::{BlobPath, InMemoryBlobStore};
pub use error::{StoreError, StoreResult};
pub use file::JsonFileListingStore;
pub use fs_blob::FsBlobStore;
pub use memory::InMemoryListingStore;
pub use traits::{BlobStore, ListingStore};
