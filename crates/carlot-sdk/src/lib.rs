//! Client SDK for Carlot.
//!
//! Everything a front end needs to drive the listing API:
//!
//! - [`ApiClient`]: typed calls to `/api/cars` with the session's bearer
//!   credential attached
//! - [`ListingForm`]: create/edit form fields and comma-separated tag parsing
//! - [`ImagePicker`]: client-side image checks (type, size, count) before
//!   any network call
//! - [`Uploader`]: pushes picked images to a [`BlobStore`](carlot_store::BlobStore)
//!   under the owner's namespace and collects their URLs
//! - [`ListingEditor`]: the submit flows tying the above together
//! - [`Session`] / [`ClientConfig`]: who is signed in and where to talk to

pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod form;
pub mod picker;
pub mod session;
pub mod upload;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use editor::ListingEditor;
pub use error::{SdkError, SdkResult};
pub use form::{parse_tags, ListingForm};
pub use picker::{CandidateImage, ImagePicker, ImageSource, Rejection};
pub use session::Session;
pub use upload::{object_path, sanitize_file_name, Uploader};
