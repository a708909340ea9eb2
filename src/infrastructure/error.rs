//! Infrastructure-level errors (dataset I/O and record lookup)

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("no {collection} record with id {id}")]
    MissingRecord { collection: &'static str, id: String },
}

/// Result type for infrastructure operations.
pub type InfraResult<T> = Result<T, InfraError>;
