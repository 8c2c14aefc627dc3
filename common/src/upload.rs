//! Image file-input checks, run before any preview or upload.

use std::fmt;

pub const ALLOWED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Value of the `accept` attribute on image inputs.
pub fn accept_attr() -> String {
    ALLOWED_IMAGE_TYPES.join(",")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadError {
    UnsupportedType,
    TooLarge,
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::UnsupportedType => f.write_str("Please select a valid image file"),
            UploadError::TooLarge => f.write_str("File size must be less than 5MB"),
        }
    }
}

impl std::error::Error for UploadError {}

/// Type is checked first; a file failing both reports the type.
pub fn validate_image(content_type: &str, size: u64) -> Result<(), UploadError> {
    let content_type = content_type.trim();
    if !ALLOWED_IMAGE_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(content_type))
    {
        return Err(UploadError::UnsupportedType);
    }
    if size > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge);
    }
    Ok(())
}
