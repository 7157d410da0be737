//! Configuration management for Receiptor.
//!
//! Settings come from an optional TOML file with CLI/env overrides on
//! top. Precedence: explicit flags > config file > built-in defaults.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::ledger::{ReceiptLedger, RecoveryPolicy};
use crate::ocr::{OcrBackend, OcrConfig, TesseractBackend};
use crate::pipeline::ExtractionPipeline;
use crate::storage::ImageStore;

/// Name of the ledger file inside the uploads directory.
pub const LEDGER_FILE_NAME: &str = "receipts.json";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Directory holding stored images and the ledger file.
    pub uploads_dir: PathBuf,
    /// Path of the receipts ledger.
    pub ledger_path: PathBuf,
    /// Tesseract language hint.
    pub ocr_language: String,
    /// What to do with an unreadable ledger file.
    pub ledger_recovery: RecoveryPolicy,
    /// Server bind host.
    pub host: String,
    /// Server bind port.
    pub port: u16,
}

impl Settings {
    pub fn create_ledger(&self) -> Arc<ReceiptLedger> {
        Arc::new(ReceiptLedger::new(&self.ledger_path, self.ledger_recovery))
    }

    pub fn create_ocr_backend(&self) -> Box<dyn OcrBackend> {
        Box::new(TesseractBackend::with_config(OcrConfig {
            language: self.ocr_language.clone(),
        }))
    }

    pub fn create_pipeline(&self, ledger: Arc<ReceiptLedger>) -> ExtractionPipeline {
        ExtractionPipeline::new(
            ImageStore::new(&self.uploads_dir),
            self.create_ocr_backend(),
            ledger,
        )
    }
}

/// On-disk configuration file shape. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<String>,
    uploads_dir: Option<String>,
    ocr_language: Option<String>,
    ledger_recovery: Option<RecoveryPolicy>,
    host: Option<String>,
    port: Option<u16>,
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("receiptor"))
        .unwrap_or_else(|| PathBuf::from("./receiptor-data"))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("receiptor").join("config.toml"))
}

/// Load settings from the config file (explicit path, or the default
/// location if present) and apply the data-dir override.
pub fn load_settings(
    config_path: Option<&Path>,
    data_dir_override: Option<&Path>,
) -> anyhow::Result<Settings> {
    let file = match config_path {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("cannot read config {}: {}", path.display(), e))?;
            toml::from_str(&data)
                .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?
        }
        None => match default_config_path() {
            Some(path) if path.exists() => {
                let data = std::fs::read_to_string(&path)?;
                toml::from_str(&data)
                    .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?
            }
            _ => ConfigFile::default(),
        },
    };

    let data_dir = data_dir_override
        .map(Path::to_path_buf)
        .or_else(|| file.data_dir.as_deref().map(expand))
        .unwrap_or_else(default_data_dir);

    let uploads_dir = file
        .uploads_dir
        .as_deref()
        .map(expand)
        .unwrap_or_else(|| data_dir.join("uploads"));

    // The ledger lives next to the images it references
    let ledger_path = uploads_dir.join(LEDGER_FILE_NAME);

    Ok(Settings {
        data_dir,
        uploads_dir,
        ledger_path,
        ocr_language: file.ocr_language.unwrap_or_else(|| "eng".to_string()),
        ledger_recovery: file.ledger_recovery.unwrap_or_default(),
        host: file.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: file.port.unwrap_or(DEFAULT_PORT),
    })
}
