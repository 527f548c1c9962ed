//! Client-side image selection with type, size and count checks.
//!
//! Checks run in a fixed order on every batch of picked files:
//!
//! 1. files whose content type is not `image/*` are dropped, each with its
//!    own rejection;
//! 2. if the remaining files would push the listing over [`MAX_IMAGES`]
//!    (counting kept and already-pending images), the whole batch is refused;
//! 3. files larger than [`MAX_IMAGE_BYTES`] are dropped, each with its own
//!    rejection.
//!
//! Nothing here touches the network.

use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use carlot_types::{is_image_content_type, MAX_IMAGES, MAX_IMAGE_BYTES};

/// Where a picked image's bytes come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    Memory(Bytes),
    File(PathBuf),
}

/// A file offered to the picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateImage {
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub source: ImageSource,
}

impl CandidateImage {
    pub fn from_bytes(name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size: data.len() as u64,
            source: ImageSource::Memory(data),
        }
    }

    /// Describe a file on disk. Only metadata is read here; the content is
    /// loaded at upload time.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            content_type: content_type_for_name(&name).to_string(),
            name,
            size: metadata.len(),
            source: ImageSource::File(path.to_path_buf()),
        })
    }

    /// Load the image bytes.
    pub async fn read(&self) -> std::io::Result<Bytes> {
        match &self.source {
            ImageSource::Memory(data) => Ok(data.clone()),
            ImageSource::File(path) => Ok(Bytes::from(tokio::fs::read(path).await?)),
        }
    }
}

/// Guess a MIME type from a file name's extension.
pub fn content_type_for_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "tif" | "tiff" => "image/tiff",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Why a picked file (or batch) was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    NotAnImage { name: String },
    TooMany { limit: usize },
    TooLarge { name: String },
}

impl Rejection {
    /// Short heading for the message.
    pub fn title(&self) -> &'static str {
        match self {
            Self::NotAnImage { .. } => "Invalid file type",
            Self::TooMany { .. } => "Too many images",
            Self::TooLarge { .. } => "File too large",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnImage { name } => write!(f, "{name} is not an image file"),
            Self::TooMany { limit } => write!(f, "You can only have up to {limit} images total"),
            Self::TooLarge { name } => write!(f, "{name} exceeds 5MB limit"),
        }
    }
}

/// Images attached to a listing being created or edited.
///
/// `existing` are URLs already on the listing (edit only); `pending` are
/// newly picked files that still need uploading. On submit the listing's
/// images become `existing ++ uploaded(pending)`.
#[derive(Clone, Debug, Default)]
pub struct ImagePicker {
    existing: Vec<String>,
    pending: Vec<CandidateImage>,
}

impl ImagePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the images already on a listing.
    pub fn with_existing(existing: Vec<String>) -> Self {
        Self {
            existing,
            pending: Vec::new(),
        }
    }

    pub fn existing(&self) -> &[String] {
        &self.existing
    }

    pub fn pending(&self) -> &[CandidateImage] {
        &self.pending
    }

    pub fn total(&self) -> usize {
        self.existing.len() + self.pending.len()
    }

    /// Offer a batch of files. Accepted files join `pending`; the returned
    /// rejections are meant to be shown to the user one by one.
    pub fn add(&mut self, files: Vec<CandidateImage>) -> Vec<Rejection> {
        let mut rejections = Vec::new();

        let images: Vec<CandidateImage> = files
            .into_iter()
            .filter(|file| {
                let ok = is_image_content_type(&file.content_type);
                if !ok {
                    rejections.push(Rejection::NotAnImage {
                        name: file.name.clone(),
                    });
                }
                ok
            })
            .collect();

        if images.len() + self.total() > MAX_IMAGES {
            rejections.push(Rejection::TooMany { limit: MAX_IMAGES });
            return rejections;
        }

        for file in images {
            if file.size > MAX_IMAGE_BYTES {
                rejections.push(Rejection::TooLarge { name: file.name });
            } else {
                self.pending.push(file);
            }
        }
        rejections
    }

    /// Drop a kept image by position. Returns the removed URL.
    pub fn remove_existing(&mut self, index: usize) -> Option<String> {
        (index < self.existing.len()).then(|| self.existing.remove(index))
    }

    /// Drop a pending image by position.
    pub fn remove_pending(&mut self, index: usize) -> Option<CandidateImage> {
        (index < self.pending.len()).then(|| self.pending.remove(index))
    }

    /// Split into kept URLs and files still to upload.
    pub fn into_parts(self) -> (Vec<String>, Vec<CandidateImage>) {
        (self.existing, self.pending)
    }
}
