//! Scan command implementation.
//!
//! The scan loop:
//! 1. Reads the trace line by line
//! 2. Applies offset/limit windowing
//! 3. Parses the cheap record header for pre-filtering
//! 4. Dispatches to the selected operation
//! 5. Accumulates per-procedure counts for the final report

use crate::infer::infer_parameters;
use crate::mapping::ParamMappings;
use crate::model::{RecordHeader, Transaction};
use crate::utils::config::PROGRESS_INTERVAL;
use anyhow::{Context, Result};
use log::info;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// The operation a scan performs on each record
#[derive(Debug, Clone)]
pub enum ScanCommand {
    /// Print the first record matching a procedure (and optional query) name
    Get {
        procedure: String,
        query: Option<String>,
    },

    /// Reconstruct missing transaction parameters on every record
    FixParams { mappings: ParamMappings },

    /// Emit only records invoking one of the named procedures
    Extract { procedures: Vec<String> },

    /// Emit only records NOT invoking any of the named procedures
    Filter { procedures: Vec<String> },

    /// Tally per-procedure record counts (all procedures when empty)
    Count { procedures: Vec<String> },
}

/// Windowing and lookup options shared by all operations
///
/// **Public** - constructed from CLI options; `None` means "no bound"
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Skip records with a zero-based index below this
    pub offset: Option<u64>,

    /// Stop once this many records have been processed
    pub limit: Option<u64>,

    /// For `get`: only match this trace id
    pub lookup_id: Option<i64>,
}

/// Per-procedure counts accumulated over one scan
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Sorted ascending by procedure name, ready for the count table
    pub counts: BTreeMap<String, u64>,
}

impl ScanReport {
    fn bump(&mut self, procedure: &str) {
        *self.counts.entry(procedure.to_string()).or_insert(0) += 1;
    }
}

/// Execute one scan over a trace source
///
/// **Public** - main entry point called from main.rs and tests
///
/// # Arguments
/// * `reader` - trace source, one JSON record per line
/// * `writer` - destination for emitted records (stdout in the CLI)
/// * `command` - operation to perform per record
/// * `options` - offset/limit window and id lookup
///
/// # Returns
/// The per-procedure count report. Only `fixparams` and `count` populate it.
///
/// # Errors
/// Any malformed line, mapping lookup failure, or I/O failure aborts the
/// scan; there is no per-line recovery.
pub fn execute_scan<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    command: &ScanCommand,
    options: &ScanOptions,
) -> Result<ScanReport> {
    let mut report = ScanReport::default();
    let mut limit_ctr: u64 = 0;

    for (txn_ctr, line) in reader.lines().enumerate() {
        let txn_ctr = txn_ctr as u64;
        let line = line.context("failed to read trace line")?;
        let line = line.trim();

        if txn_ctr > 0 && txn_ctr % PROGRESS_INTERVAL == 0 {
            info!("Transaction #{:05}", txn_ctr);
        }
        if options.offset.is_some_and(|offset| txn_ctr < offset) {
            continue;
        }
        if options.limit.is_some_and(|limit| limit_ctr >= limit) {
            break;
        }

        let header = RecordHeader::parse(line)
            .with_context(|| format!("malformed trace record at line {}", txn_ctr + 1))?;

        match command {
            ScanCommand::Get { procedure, query } => {
                if header.catalog_name != *procedure {
                    continue;
                }
                if options.lookup_id.is_some_and(|id| id != header.id) {
                    continue;
                }
                let txn = Transaction::parse(line)
                    .with_context(|| format!("malformed trace record at line {}", txn_ctr + 1))?;
                if let Some(query_name) = query {
                    if txn.queries_named(query_name).next().is_none() {
                        continue;
                    }
                }
                writeln!(writer, "[{:05}] {}", txn_ctr, txn.catalog_name)?;
                writeln!(writer, "{}", txn.to_pretty()?)?;
                break;
            }

            ScanCommand::FixParams { mappings } => {
                // Every record goes through inference; there is no
                // catalog/id pre-filter on this operation.
                let mut txn = Transaction::parse(line)
                    .with_context(|| format!("malformed trace record at line {}", txn_ctr + 1))?;
                let changed = infer_parameters(&mut txn, mappings)
                    .with_context(|| format!("cannot fix record at line {}", txn_ctr + 1))?;
                if changed {
                    writeln!(writer, "{}", txn.to_line()?)?;
                    report.bump(&header.catalog_name);
                } else {
                    writeln!(writer, "{line}")?;
                }
                limit_ctr += 1;
            }

            ScanCommand::Extract { procedures } => {
                if procedures.iter().any(|p| *p == header.catalog_name) {
                    writeln!(writer, "{line}")?;
                    limit_ctr += 1;
                }
            }

            ScanCommand::Filter { procedures } => {
                if !procedures.iter().any(|p| *p == header.catalog_name) {
                    writeln!(writer, "{line}")?;
                    limit_ctr += 1;
                }
            }

            ScanCommand::Count { procedures } => {
                if procedures.is_empty()
                    || procedures.iter().any(|p| *p == header.catalog_name)
                {
                    report.bump(&header.catalog_name);
                    limit_ctr += 1;
                }
            }
        }
    }

    Ok(report)
}
