//! Configuration and constants for the CLI.

/// Trace source value meaning "read standard input"
pub const STDIN_SOURCE: &str = "-";

/// Emit a progress log line every this many trace records
pub const PROGRESS_INTERVAL: u64 = 10_000;

/// Width of the left-aligned name column in the count table
pub const NAME_COLUMN_WIDTH: usize = 25;

/// Width of the horizontal rules framing the count table
pub const TABLE_RULE_WIDTH: usize = 35;
