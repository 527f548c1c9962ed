use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Opaque identifier of a listing.
///
/// Identifiers are generated by the listing store on creation and never
/// change afterwards. Freshly generated ids are UUID v7 strings so they sort
/// by creation time, but callers must treat them as opaque: any string that a
/// store hands back is a valid id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    /// Generate a new time-ordered identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::EmptyIdentifier);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short representation (first 8 characters).
    pub fn short_id(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Debug for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListingId({})", self.0)
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The unique identifier of an authenticated user, as asserted by the
/// identity verifier.
///
/// A subject is also the owner id stored on every listing, and namespaces the
/// object-store paths of uploaded images. The `.` and `/` characters are
/// reserved: the first separates token fields, the second would escape the
/// per-owner upload directory.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subject(String);

impl Subject {
    pub fn new(subject: impl Into<String>) -> Result<Self, TypeError> {
        let subject = subject.into();
        if subject.is_empty() {
            return Err(TypeError::EmptyIdentifier);
        }
        if let Some(c) = subject.chars().find(|c| matches!(c, '.' | '/')) {
            return Err(TypeError::ReservedCharacter(c));
        }
        Ok(Self(subject))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Subject {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Subject> for String {
    fn from(subject: Subject) -> Self {
        subject.0
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subject({})", self.0)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
