//! CLI support for funcadl-lower
//!
//! Provides programmatic access to the `lower` command for embedding in
//! other tools.

mod convert;
mod lower;

pub use convert::parse_query;
pub use lower::{LowerOptions, LowerOutput, execute_lower};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Lowering error
    #[error("Lowering error: {0}")]
    Lower(#[from] crate::LowerError),

    /// Query or configuration JSON could not be parsed
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No input provided
    #[error("No input provided. Pass the query as an argument, use --input, or pipe JSON to stdin.")]
    NoInput,
}
