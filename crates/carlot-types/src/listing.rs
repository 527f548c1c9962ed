use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ListingId, Subject};
use crate::serde_util::null_as_default;

/// A car listing as returned to clients.
///
/// `images` order is display order: the first URL is the cover image.
/// `owner_id` is set once at creation from the verified subject and never
/// changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    #[serde(rename = "userId")]
    pub owner_id: Subject,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// The cover image, if any.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn is_owned_by(&self, subject: &Subject) -> bool {
        &self.owner_id == subject
    }
}

/// A listing as held by a listing store.
///
/// Content fields are optional because documents written by other tools (or
/// older versions) may lack them. [`ListingDocument::into_listing`] is the
/// single place where defaults are applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDocument {
    pub id: ListingId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(rename = "userId")]
    pub owner_id: Subject,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ListingDocument {
    /// Build the document for a freshly created listing.
    pub fn from_new(id: ListingId, new: NewListing, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: Some(new.title),
            description: Some(new.description),
            tags: Some(new.tags),
            images: Some(new.images),
            owner_id: new.owner_id,
            created_at,
            updated_at: None,
        }
    }

    /// Overwrite the content fields. Owner and creation time are untouched.
    pub fn apply_update(&mut self, update: ListingUpdate, updated_at: DateTime<Utc>) {
        self.title = Some(update.title);
        self.description = Some(update.description);
        self.tags = Some(update.tags);
        self.images = Some(update.images);
        self.updated_at = Some(updated_at);
    }

    /// Convert to a [`Listing`], filling missing content with empty values.
    pub fn into_listing(self) -> Listing {
        Listing {
            id: self.id,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            images: self.images.unwrap_or_default(),
            owner_id: self.owner_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Payload for creating a listing in a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub owner_id: Subject,
}

/// Replacement content for an existing listing.
///
/// Absent or `null` fields deserialize as empty: an update always
/// overwrites all four.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingUpdate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
}
