//! Receiptor - receipt image extraction and recordkeeping.
//!
//! Accepts receipt images, stores them, extracts their text with OCR,
//! parses the text into structured records, and keeps an append-only
//! JSON ledger of every processed receipt.

pub mod cli;
pub mod config;
pub mod ledger;
pub mod models;
pub mod ocr;
pub mod parser;
pub mod pipeline;
pub mod server;
pub mod storage;
pub mod validate;
