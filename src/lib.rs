//! txn-traceutil
//!
//! Inspect and transform line-delimited JSON transaction trace files.
//!
//! Each line of a trace is one recorded stored-procedure invocation with an
//! ordered parameter list and nested query invocations. The library behind
//! the `txntrace` CLI offers five operations over such traces: look up a
//! single record, reconstruct missing parameter values from correlated query
//! parameters, extract or filter records by procedure name, and tally
//! per-procedure counts.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install txn-traceutil
//! txntrace --help
//! ```

pub mod commands;
pub mod infer;
pub mod mapping;
pub mod model;
pub mod output;
pub mod utils;
