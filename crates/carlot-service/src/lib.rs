//! The Carlot listing service.
//!
//! [`ListingService`] is the application core behind the HTTP surface. Each
//! operation:
//!
//! 1. verifies the bearer credential through the injected
//!    [`IdentityVerifier`](carlot_auth::IdentityVerifier),
//! 2. enforces ownership on mutations by comparing the verified subject with
//!    the stored owner,
//! 3. translates the request into [`ListingStore`](carlot_store::ListingStore)
//!    calls, and
//! 4. for searches, filters the result set by case-insensitive substring.
//!
//! Failures are reported with the four-way [`ServiceError`] taxonomy.
//!
//! # Known gaps
//!
//! - Image count, size and type are checked by the client only.
//! - Deleting a listing leaves its uploaded images in the blob store.
//! - Delete is not idempotent: a second delete reports `NotFound`.
//! - Listing requires a credential but does not use it to restrict results.

pub mod error;
pub mod request;
pub mod service;

pub use error::{Operation, ServiceError, ServiceResult};
pub use request::{CreateListing, ListQuery, ReadPolicy};
pub use service::ListingService;
