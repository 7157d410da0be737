//! Web server for receipt extraction.
//!
//! Exposes the upload endpoint, a ledger listing, and static serving of
//! stored images under `/uploads/`.

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::ledger::ReceiptLedger;
use crate::pipeline::ExtractionPipeline;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ExtractionPipeline>,
    pub ledger: Arc<ReceiptLedger>,
    pub uploads_dir: PathBuf,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        let ledger = settings.create_ledger();
        Self {
            pipeline: Arc::new(settings.create_pipeline(ledger.clone())),
            ledger,
            uploads_dir: settings.uploads_dir.clone(),
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    if !state.pipeline.ocr().is_available() {
        tracing::warn!(
            "OCR backend not ready, uploads will fail: {}",
            state.pipeline.ocr().availability_hint()
        );
    }
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
