//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while parsing or serializing trace records
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Errors that can occur while loading the parameter mapping document
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("failed to read mapping file: {0}")]
    Io(#[from] std::io::Error),

    #[error("mapping JSON is malformed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(
        "mapping for {procedure} parameter #{index} lists {names} query names \
         but {indices} query parameter indices"
    )]
    CandidateMismatch {
        procedure: String,
        index: usize,
        names: usize,
        indices: usize,
    },

    #[error("mapping for {procedure} parameter #{index} has an empty candidate list")]
    EmptyRule { procedure: String, index: usize },
}

/// Errors raised by the parameter inference engine.
///
/// All of these indicate a configuration problem (a bad mapping file),
/// not a per-record problem, and abort the whole run.
#[derive(Error, Debug)]
pub enum InferError {
    #[error("no parameter mapping for procedure {0}")]
    UnknownProcedure(String),

    #[error(
        "procedure {procedure}: transaction has {params} parameter slots \
         but the mapping has {rules} rule slots"
    )]
    SlotCountMismatch {
        procedure: String,
        params: usize,
        rules: usize,
    },

    #[error(
        "procedure {procedure}: candidate index {index} is out of range \
         for a {query} invocation with {len} parameters"
    )]
    CandidateOutOfRange {
        procedure: String,
        query: String,
        index: usize,
        len: usize,
    },
}
