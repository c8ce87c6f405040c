//! Infrastructure-level errors (wraps domain and formatting errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::DomainError;
use crate::logging::FormatError;

/// Infrastructure errors wrap domain errors and add I/O-level concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Format(#[from] FormatError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid tree document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {message}")]
    Config { message: String },
}

impl InfraError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for InfraError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config {
            message: e.to_string(),
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
