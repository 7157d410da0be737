//! OCR backend abstraction.

use std::path::Path;

use thiserror::Error;

/// Errors from OCR backends.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR extraction failed: {0}")]
    RecognitionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of running OCR on one image.
#[derive(Debug, Clone)]
pub struct OcrOutput {
    /// Extracted text content. May be empty for a blank image.
    pub text: String,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for OCR backends.
pub trait OcrBackend: Send + Sync {
    /// Check if this backend can actually run (binaries installed, etc.).
    fn is_available(&self) -> bool;

    /// Describe what is needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Run OCR on an image file.
    fn recognize(&self, image_path: &Path) -> Result<OcrOutput, OcrError>;
}

/// Configuration for OCR backends.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Language for OCR (e.g., "eng", "chi_sim").
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
        }
    }
}
