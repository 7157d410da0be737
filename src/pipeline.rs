//! Extraction pipeline: validate → store → recognize → parse → persist.
//!
//! Stages run strictly in order; the first failure aborts the request
//! and nothing is retried. The caller sees all-or-nothing, but side
//! effects already committed before a later failure (the stored image,
//! in particular) are not rolled back.

use std::sync::Arc;

use thiserror::Error;

use crate::ledger::{LedgerError, ReceiptLedger};
use crate::models::Receipt;
use crate::ocr::{OcrBackend, OcrError};
use crate::parser::parse_receipt_text;
use crate::storage::{ImageStore, StorageError};
use crate::validate::{detect_mime_mismatch, validate_mime_type, InvalidFileType};

/// Errors from the extraction pipeline, one per failing stage.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    InvalidFileType(#[from] InvalidFileType),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("OCR extraction failed: {0}")]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ExtractError {
    /// Whether the caller can fix this by changing their input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExtractError::InvalidFileType(_))
    }

    /// Stage-level message safe to show callers. Underlying causes stay
    /// in server-side logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            ExtractError::InvalidFileType(_) => "Invalid file type",
            ExtractError::Storage(StorageError::DirectoryCreateFailed(_)) => {
                "Failed to create uploads directory"
            }
            ExtractError::Storage(StorageError::ImageWriteFailed(_)) => "Failed to save image",
            ExtractError::Ocr(_) => "OCR extraction failed",
            ExtractError::Ledger(_) => "Failed to save receipt data",
        }
    }
}

/// Orchestrates one receipt extraction from upload to persisted record.
pub struct ExtractionPipeline {
    store: ImageStore,
    ocr: Box<dyn OcrBackend>,
    ledger: Arc<ReceiptLedger>,
}

impl ExtractionPipeline {
    pub fn new(store: ImageStore, ocr: Box<dyn OcrBackend>, ledger: Arc<ReceiptLedger>) -> Self {
        Self { store, ocr, ledger }
    }

    pub fn ledger(&self) -> &ReceiptLedger {
        &self.ledger
    }

    pub fn ocr(&self) -> &dyn OcrBackend {
        self.ocr.as_ref()
    }

    /// Process one uploaded image and return the persisted record.
    pub async fn run(
        &self,
        bytes: &[u8],
        mime_type: &str,
        original_name: &str,
    ) -> Result<Receipt, ExtractError> {
        validate_mime_type(mime_type).map_err(|e| {
            tracing::warn!("rejected file type: {}", e.0);
            e
        })?;

        // Advisory only: a lying Content-Type still gets processed
        if let Some(detected) = detect_mime_mismatch(bytes, mime_type) {
            tracing::warn!(
                "declared type {} but content looks like {} ({})",
                mime_type,
                detected,
                original_name
            );
        }

        let stored = self.store.save(bytes, original_name).map_err(|e| {
            tracing::error!("failed to store image {}: {}", original_name, e);
            e
        })?;
        tracing::debug!("stored image as {}", stored.stored_name);

        let ocr_output = self.ocr.recognize(&stored.path).map_err(|e| {
            tracing::error!("OCR failed for {}: {}", stored.stored_name, e);
            e
        })?;
        tracing::debug!(
            "OCR produced {} chars in {}ms",
            ocr_output.text.len(),
            ocr_output.processing_time_ms
        );

        let parsed = parse_receipt_text(&ocr_output.text);
        let receipt = Receipt::from_parsed(parsed, stored.public_url());

        self.ledger.append(&receipt).await.map_err(|e| {
            tracing::error!("failed to record receipt {}: {}", receipt.id, e);
            e
        })?;

        tracing::info!(
            "processed receipt {} from {} ({} items, total {})",
            receipt.id,
            original_name,
            receipt.receipt_items.len(),
            receipt.total
        );
        Ok(receipt)
    }
}
