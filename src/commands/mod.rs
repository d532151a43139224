//! CLI command implementations.
//!
//! All five operations share one line-oriented scan loop; the command enum
//! selects the per-record behavior.

pub mod scan;

// Re-export main command types
pub use scan::{execute_scan, ScanCommand, ScanOptions, ScanReport};
