//! Formatting errors

use thiserror::Error;

/// Raised while turning a record into a line. Unknown levels never end up
/// here: they fall back to the default template.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("format mismatch in {template:?}: {reason}")]
    FormatMismatch { template: String, reason: String },

    #[error("invalid time format: {0:?}")]
    InvalidTimeFormat(String),

    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(f64),
}

impl FormatError {
    pub(crate) fn mismatch(template: &str, reason: impl Into<String>) -> Self {
        FormatError::FormatMismatch {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for formatting operations.
pub type FormatResult<T> = Result<T, FormatError>;
