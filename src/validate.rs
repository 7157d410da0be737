//! Upload validation: MIME allow-list and content sniffing.

use thiserror::Error;

/// MIME types accepted for receipt uploads.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg"];

/// Rejection of a declared MIME type outside the allow-list.
#[derive(Debug, Error)]
#[error("invalid file type: {0}")]
pub struct InvalidFileType(pub String);

/// Check a declared MIME type against the allow-list.
///
/// Pure check on the declared type only; content sniffing is a separate,
/// advisory concern (see [`detect_mime_mismatch`]).
pub fn validate_mime_type(mime: &str) -> Result<(), InvalidFileType> {
    if ALLOWED_IMAGE_TYPES.contains(&mime) {
        Ok(())
    } else {
        Err(InvalidFileType(mime.to_string()))
    }
}

/// Detect the MIME type from magic bytes and compare it to the declared one.
///
/// Returns `Some(detected)` when the content disagrees with the declaration.
/// Used for logging only; a mismatch never rejects the upload.
pub fn detect_mime_mismatch(bytes: &[u8], declared: &str) -> Option<&'static str> {
    let detected = infer::get(bytes)?.mime_type();

    // Normalize declared MIME for comparison (strip charset, etc.)
    let declared_normalized = declared
        .split(';')
        .next()
        .unwrap_or(declared)
        .trim()
        .to_lowercase();

    // image/jpg is a common nonstandard alias for image/jpeg
    let declared_normalized = if declared_normalized == "image/jpg" {
        "image/jpeg".to_string()
    } else {
        declared_normalized
    };

    if detected != declared_normalized {
        Some(detected)
    } else {
        None
    }
}
