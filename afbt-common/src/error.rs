//! Common error types for AFBT

use thiserror::Error;

/// Common result type for AFBT operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the AFBT tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A row lacks a column required for the requested operation
    #[error("Missing field '{field}' for pair ({query_id}, {reference_id})")]
    MissingField {
        field: &'static str,
        query_id: String,
        reference_id: String,
    },

    /// A segment boundary is not a non-negative whole number of seconds
    #[error("Invalid value '{value}' in field '{field}' for pair ({query_id}, {reference_id})")]
    InvalidInterval {
        field: &'static str,
        value: String,
        query_id: String,
        reference_id: String,
    },

    /// Media probing failed (tool missing, non-zero exit, or unreadable output)
    #[error("Probe error: {0}")]
    Probe(String),

    /// Invalid user input or command-line parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
