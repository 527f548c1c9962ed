//! Client-side limits on listing images.
//!
//! These limits are checked by the image picker before any upload happens.
//! The listing service does not re-check them: a direct API call with more
//! than [`MAX_IMAGES`] URLs is accepted.

/// Maximum number of images on a single listing (existing plus new).
pub const MAX_IMAGES: usize = 10;

/// Maximum size of a single source image file (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Returns `true` when a MIME type names an image (`image/*`).
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_types() {
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("image/jpeg"));
        assert!(is_image_content_type("IMAGE/webp"));
    }

    #[test]
    fn non_image_types() {
        assert!(!is_image_content_type("application/pdf"));
        assert!(!is_image_content_type("text/plain"));
        assert!(!is_image_content_type("image"));
        assert!(!is_image_content_type(""));
    }

    #[test]
    fn size_limit_is_five_mebibytes() {
        assert_eq!(MAX_IMAGE_BYTES, 5_242_880);
    }
}
