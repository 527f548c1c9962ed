use carlot_types::serde_util::null_as_default;
use serde::{Deserialize, Serialize};

/// Request to create a listing.
///
/// `user_id` is the owner the client claims. It must equal the verified
/// subject or the request is rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListing {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
}

/// Filters for listing and searching.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Only listings owned by this subject. Empty means no filter.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Case-insensitive substring over title, description and tags.
    #[serde(default)]
    pub search: Option<String>,
}

impl ListQuery {
    pub fn owner_filter(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn search_term(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}

/// Whether read operations demand a credential.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadPolicy {
    /// Reads require a valid bearer credential.
    #[default]
    RequireCredential,
    /// Reads without a credential are served. A credential that is present
    /// but invalid is still rejected.
    AllowAnonymous,
}
