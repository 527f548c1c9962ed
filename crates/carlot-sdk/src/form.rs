use carlot_types::ListingUpdate;

use crate::error::{SdkError, SdkResult};

/// Split a comma-separated tag input, trimming whitespace and dropping empties.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// The text fields of the create/edit listing form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    /// Raw comma-separated tags as typed.
    pub tags: String,
}

impl ListingForm {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        tags: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tags: tags.into(),
        }
    }

    /// Pre-fill the form from an existing listing for editing.
    pub fn from_listing(listing: &carlot_types::Listing) -> Self {
        Self {
            title: listing.title.clone(),
            description: listing.description.clone(),
            tags: listing.tags.join(", "),
        }
    }

    /// Title and description are required fields.
    pub fn validate(&self) -> SdkResult<()> {
        if self.title.trim().is_empty() {
            return Err(SdkError::InvalidInput("Title is required".into()));
        }
        if self.description.trim().is_empty() {
            return Err(SdkError::InvalidInput("Description is required".into()));
        }
        Ok(())
    }

    pub fn tag_list(&self) -> Vec<String> {
        parse_tags(&self.tags)
    }

    /// Combine the form with final image URLs into an update payload.
    pub fn to_update(&self, images: Vec<String>) -> ListingUpdate {
        ListingUpdate {
            title: self.title.clone(),
            description: self.description.clone(),
            tags: self.tag_list(),
            images,
        }
    }
}
