//! Output rendering.
//!
//! Record lines stream straight to the writer inside the scan loop; this
//! module only renders the final per-procedure count table.

pub mod report;

// Re-export main entry point
pub use report::render_count_table;
