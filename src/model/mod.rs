//! Trace record model.
//!
//! This module handles:
//! - Parsing one JSON trace line into a Transaction
//! - The cheap header-only pre-filter parse
//! - Serializing reconstructed records back to JSON

pub mod record;

// Re-export main types
pub use record::{is_set, Query, RecordHeader, Transaction};
