//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the entity tree contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("entity name must not be empty")]
    EmptyName,

    #[error("unknown entity kind: {0}")]
    UnknownKind(String),

    #[error("malformed tree at {path}: {reason}")]
    MalformedTree { path: String, reason: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
