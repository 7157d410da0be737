//! CLI commands implementation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use crate::config::{self, Settings};
use crate::server;

#[derive(Parser)]
#[command(name = "receiptor")]
#[command(about = "Receipt image OCR extraction and recordkeeping service")]
#[command(version)]
pub struct Cli {
    /// Data directory
    #[arg(long, global = true, env = "RECEIPTOR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Bind host (overrides configuration)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Process a single receipt image and record it
    Extract {
        /// Path to the receipt image
        image: PathBuf,
    },

    /// List recorded receipts
    List,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = config::load_settings(cli.config.as_deref(), cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| settings.host.clone());
            let port = port.unwrap_or(settings.port);
            server::serve(&settings, &host, port).await
        }
        Commands::Extract { image } => extract_one(&settings, &image).await,
        Commands::List => list_receipts(&settings).await,
    }
}

async fn extract_one(settings: &Settings, image: &PathBuf) -> anyhow::Result<()> {
    let bytes = std::fs::read(image)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", image.display(), e))?;

    // No Content-Type on the command line; sniff it from the bytes
    let mime_type = infer::get(&bytes)
        .map(|t| t.mime_type())
        .ok_or_else(|| anyhow::anyhow!("could not determine file type of {}", image.display()))?;

    let original_name = image
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    let ledger = settings.create_ledger();
    let pipeline = settings.create_pipeline(ledger);
    if !pipeline.ocr().is_available() {
        anyhow::bail!("{}", pipeline.ocr().availability_hint());
    }
    let receipt = pipeline.run(&bytes, mime_type, &original_name).await?;

    println!("{} {}", style("Receipt").bold(), receipt.id);
    if !receipt.vendor_name.is_empty() {
        println!("  vendor:   {}", receipt.vendor_name);
    }
    if !receipt.date.is_empty() {
        println!("  date:     {}", receipt.date);
    }
    if !receipt.currency.is_empty() {
        println!("  currency: {}", receipt.currency);
    }
    for item in &receipt.receipt_items {
        println!("  item:     {} {:.2}", item.item_name, item.item_cost);
    }
    println!("  tax:      {:.2}", receipt.tax);
    println!("  total:    {:.2}", receipt.total);
    println!(
        "  image:    {}",
        style(settings.uploads_dir.join(
            receipt.image_url.trim_start_matches("/uploads/")
        ).display())
        .dim()
    );
    Ok(())
}

async fn list_receipts(settings: &Settings) -> anyhow::Result<()> {
    let ledger = settings.create_ledger();
    let receipts = ledger.load().await?;

    if receipts.is_empty() {
        println!("No receipts recorded.");
        return Ok(());
    }

    for receipt in &receipts {
        println!(
            "{}  {:<24} {:>10.2}  {}",
            style(&receipt.id[..8]).dim(),
            receipt.vendor_name,
            receipt.total,
            receipt.date
        );
    }
    println!("{} receipt(s)", receipts.len());
    Ok(())
}
