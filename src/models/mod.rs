//! Data models for Receiptor.

mod receipt;

pub use receipt::{Receipt, ReceiptItem};
