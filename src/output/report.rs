//! Count table rendering.

use crate::utils::config::{NAME_COLUMN_WIDTH, TABLE_RULE_WIDTH};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Render per-procedure counts as a fixed-width table
///
/// **Public** - called by main.rs after a `count` scan
///
/// Rows are sorted ascending by procedure name (the map's iteration order)
/// and followed by a TOTAL row summing all counts. Returns the table with a
/// trailing newline, ready for `print!`.
pub fn render_count_table(counts: &BTreeMap<String, u64>) -> String {
    let rule = "-".repeat(TABLE_RULE_WIDTH);
    let mut out = String::new();

    writeln!(out, "{:<NAME_COLUMN_WIDTH$}{}", "Procedure", "Txn Count").unwrap();
    writeln!(out, "{rule}").unwrap();

    let mut total = 0;
    for (procedure, count) in counts {
        writeln!(out, "{procedure:<NAME_COLUMN_WIDTH$}{count}").unwrap();
        total += count;
    }

    writeln!(out, "{rule}").unwrap();
    writeln!(out, "{:<NAME_COLUMN_WIDTH$}{total}", "TOTAL").unwrap();
    out
}
