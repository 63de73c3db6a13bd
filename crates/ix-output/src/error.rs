//! Error types for ix-output.

use thiserror::Error;

/// Errors that can occur when writing results or traces.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("existing results file {path} has no `run_id` column")]
    MissingRunId { path: String },
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
