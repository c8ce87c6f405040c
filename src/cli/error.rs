//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } | InfraError::Walk(_) => crate::exitcode::IOERR,
                InfraError::NotADirectory(_) => crate::exitcode::NOINPUT,
                InfraError::Domain(_) | InfraError::Json(_) => crate::exitcode::DATAERR,
                InfraError::Format(_) | InfraError::Config { .. } => crate::exitcode::CONFIG,
            },
        }
    }
}
