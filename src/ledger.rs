//! Append-only JSON ledger of processed receipts.
//!
//! The ledger is one pretty-printed JSON array, read in full, appended
//! to in memory, and rewritten in full on every successful extraction.
//! A missing file is an empty ledger. An unreadable or corrupt file is
//! handled per [`RecoveryPolicy`]: the default resets to an empty ledger
//! so a corrupt file never blocks new extractions, at the cost of
//! discarding the unreadable content on the next write.
//!
//! All read-modify-write cycles go through one async mutex, so two
//! in-process appends can never lose each other's record.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::Receipt;

/// Errors from ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to save receipt ledger: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("receipt ledger is corrupt: {0}")]
    Corrupt(String),
}

/// What to do when the ledger file exists but cannot be read or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// Log a warning and start from an empty ledger (availability over
    /// durability; matches the historical behavior).
    #[default]
    Reset,
    /// Surface the corruption as an error and abort the request.
    Fail,
}

/// File-backed ledger of all processed receipts.
pub struct ReceiptLedger {
    path: PathBuf,
    policy: RecoveryPolicy,
    write_lock: Mutex<()>,
}

impl ReceiptLedger {
    pub fn new(path: impl Into<PathBuf>, policy: RecoveryPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            write_lock: Mutex::new(()),
        }
    }

    /// Read the full ledger, applying the recovery policy.
    ///
    /// Takes the same lock as [`append`](Self::append), so a read can
    /// never observe a half-rewritten file.
    pub async fn load(&self) -> Result<Vec<Receipt>, LedgerError> {
        let _guard = self.write_lock.lock().await;
        self.read_unlocked()
    }

    /// Read the file without taking the lock. Callers must hold it.
    fn read_unlocked(&self) -> Result<Vec<Receipt>, LedgerError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => return self.recover(format!("read failed: {}", e), 0),
        };

        match serde_json::from_str(&data) {
            Ok(receipts) => Ok(receipts),
            Err(e) => self.recover(format!("parse failed: {}", e), data.len()),
        }
    }

    fn recover(&self, cause: String, discarded_bytes: usize) -> Result<Vec<Receipt>, LedgerError> {
        match self.policy {
            RecoveryPolicy::Reset => {
                tracing::warn!(
                    "could not read receipt ledger {}, starting fresh ({} bytes will be discarded on next write): {}",
                    self.path.display(),
                    discarded_bytes,
                    cause
                );
                Ok(Vec::new())
            }
            RecoveryPolicy::Fail => Err(LedgerError::Corrupt(cause)),
        }
    }

    /// Append one record and rewrite the whole file.
    ///
    /// All-or-nothing per record: the file only changes if serialization
    /// and the write both succeed.
    pub async fn append(&self, receipt: &Receipt) -> Result<(), LedgerError> {
        let _guard = self.write_lock.lock().await;

        let mut receipts = self.read_unlocked()?;
        receipts.push(receipt.clone());

        // Field order on Receipt is the stable key order
        let json = serde_json::to_string_pretty(&receipts)
            .map_err(|e| LedgerError::WriteFailed(std::io::Error::other(e)))?;
        std::fs::write(&self.path, json).map_err(LedgerError::WriteFailed)
    }
}
