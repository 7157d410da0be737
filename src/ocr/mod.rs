//! OCR boundary for extracting text from receipt images.
//!
//! The pipeline depends only on the [`OcrBackend`] trait; Tesseract via
//! the system binary is the default engine. Engine failure is a hard
//! error and is never retried; empty-but-successful text is a valid
//! result, distinct from failure.

mod backend;
mod tesseract;

pub use backend::{OcrBackend, OcrConfig, OcrError, OcrOutput};
pub use tesseract::TesseractBackend;
