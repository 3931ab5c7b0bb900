//! User-facing failure kinds. All of them are detected before any parsing
//! begins and abort the run; I/O trouble after that point travels as
//! `anyhow::Error` with context attached.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Error: No file specified")]
    MissingDataFile,

    #[error("Not enough arguments: query needs {required}, got {supplied}")]
    InsufficientArguments { required: usize, supplied: usize },

    #[error("Failed to open file: {}", path.display())]
    FileOpenFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unknown question selector: {0}")]
    UnknownQuerySelector(String),

    #[error("Unsupported filter combination: {0}")]
    UnsupportedFilter(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidArgument { name: &'static str, value: String },
}

impl QueryError {
    /// Process exit code for this failure; successful runs exit with 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            QueryError::FileOpenFailure { .. } => 3,
            QueryError::MissingDataFile
            | QueryError::InsufficientArguments { .. }
            | QueryError::UnknownQuerySelector(_)
            | QueryError::UnsupportedFilter(_)
            | QueryError::InvalidArgument { .. } => 2,
        }
    }
}

/// Exit code for an arbitrary pipeline error: typed kinds map through
/// `QueryError::exit_code`, anything else is a generic failure.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<QueryError>().map(QueryError::exit_code).unwrap_or(1)
}
