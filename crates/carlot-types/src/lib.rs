//! Foundation types for Carlot.
//!
//! Every other Carlot crate depends on `carlot-types`. It holds the listing
//! data model, the identifiers that flow between the service and its
//! backends, and the case-insensitive search predicate shared by the server
//! and the client.
//!
//! # Key Types
//!
//! - [`ListingId`]: Opaque store-generated listing identifier
//! - [`Subject`]: Verified identity of an authenticated user
//! - [`Listing`]: A car listing as returned to clients
//! - [`ListingDocument`]: A listing as held by a store, with optional content fields
//! - [`NewListing`] / [`ListingUpdate`]: Write payloads for the store

pub mod error;
pub mod ids;
pub mod limits;
pub mod listing;
pub mod search;
pub mod serde_util;

pub use error::TypeError;
pub use ids::{ListingId, Subject};
pub use limits::{is_image_content_type, MAX_IMAGES, MAX_IMAGE_BYTES};
pub use listing::{Listing, ListingDocument, ListingUpdate, NewListing};
pub use search::{filter_listings, matches};
