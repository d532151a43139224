//! Parameter inference.
//!
//! Recovers missing transaction parameter values from correlated nested
//! query parameters, per the declarative parameter mapping.

pub mod engine;

// Re-export main entry point
pub use engine::infer_parameters;
