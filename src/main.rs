//! txntrace CLI
//!
//! Inspects and transforms line-delimited JSON transaction trace files:
//! single-record lookup, missing-parameter reconstruction, extraction and
//! filtering by procedure name, and per-procedure counting.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use txn_traceutil::commands::{execute_scan, ScanCommand, ScanOptions, ScanReport};
use txn_traceutil::mapping::ParamMappings;
use txn_traceutil::output::render_count_table;
use txn_traceutil::utils::config::STDIN_SOURCE;

/// Inspect and transform line-delimited JSON transaction traces
#[derive(Parser, Debug)]
#[command(name = "txntrace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Trace file to read ("-" reads standard input)
    #[arg(long, global = true, default_value = STDIN_SOURCE)]
    trace: String,

    /// Only consider the record with this trace id
    #[arg(long, global = true)]
    id: Option<i64>,

    /// Skip records with a zero-based index below this
    #[arg(long, global = true)]
    offset: Option<u64>,

    /// Stop after this many records have been processed
    #[arg(long, global = true)]
    limit: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the first record invoking a procedure, optionally requiring a
    /// nested query by name
    Get {
        /// Procedure name to match
        procedure: String,

        /// Require at least one nested query with this name
        query: Option<String>,
    },

    /// Reconstruct missing transaction parameters from nested query
    /// parameters, streaming every record to stdout
    Fixparams {
        /// Parameter mapping JSON document
        #[arg(long = "param-map")]
        param_map: PathBuf,
    },

    /// Emit only records invoking the named procedures
    Extract {
        /// Procedure names to keep
        #[arg(required = true)]
        procedures: Vec<String>,
    },

    /// Emit only records NOT invoking the named procedures
    Filter {
        /// Procedure names to drop
        #[arg(required = true)]
        procedures: Vec<String>,
    },

    /// Tally per-procedure record counts
    Count {
        /// Procedure names to count (all procedures when omitted)
        procedures: Vec<String>,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging; stderr only, stdout stays a clean data stream
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let options = ScanOptions {
        offset: cli.offset,
        limit: cli.limit,
        lookup_id: cli.id,
    };

    let command = match cli.command {
        Commands::Get { procedure, query } => ScanCommand::Get { procedure, query },
        Commands::Fixparams { param_map } => {
            let mappings = ParamMappings::load(&param_map).with_context(|| {
                format!("failed to load parameter mapping {}", param_map.display())
            })?;
            debug!("Loaded parameter mappings for {} procedures", mappings.len());
            ScanCommand::FixParams { mappings }
        }
        Commands::Extract { procedures } => ScanCommand::Extract { procedures },
        Commands::Filter { procedures } => ScanCommand::Filter { procedures },
        Commands::Count { procedures } => ScanCommand::Count { procedures },
    };

    debug!(
        "Options: [offset={:?}, limit={:?}, lookup_id={:?}]",
        options.offset, options.limit, options.lookup_id
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let report = if cli.trace == STDIN_SOURCE {
        let stdin = io::stdin();
        execute_scan(stdin.lock(), &mut out, &command, &options)?
    } else {
        let file = File::open(&cli.trace)
            .with_context(|| format!("failed to open trace file {}", cli.trace))?;
        execute_scan(BufReader::new(file), &mut out, &command, &options)?
    };

    render_report(&mut out, &command, &report)?;
    Ok(())
}

/// Print the final count table, if the command produced one
///
/// **Private** - for fixparams the primary output stream carries the
/// reconstructed trace, so counts go to debug logging instead.
fn render_report<W: Write>(out: &mut W, command: &ScanCommand, report: &ScanReport) -> Result<()> {
    if report.counts.is_empty() {
        return Ok(());
    }
    if matches!(command, ScanCommand::FixParams { .. }) {
        debug!("Fixed records per procedure: {:?}", report.counts);
    } else {
        write!(out, "{}", render_count_table(&report.counts))?;
    }
    Ok(())
}
