//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent navigation and rendering contract violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("no child matches selector: {selector}")]
    NotFound { selector: String },

    #[error("node has no display strategy bound: {node}")]
    MissingDisplayStrategy { node: String },

    #[error("upstream fetch failed: {context}")]
    UpstreamFailure {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
