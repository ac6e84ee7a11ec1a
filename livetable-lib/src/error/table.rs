//! Table model error types

use std::time::Duration;

use super::FetchError;
use crate::resource::ResourceKind;

/// Errors that can occur while reconciling or operating on a table model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A single accessor call failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The scheduler spent its whole retry window without a successful refresh.
    #[error("gave up after {attempts} attempts over {elapsed:?}: {source}")]
    RetryExhausted {
        /// Number of refresh attempts made.
        attempts: u32,
        /// Time spent retrying.
        elapsed: Duration,
        /// Error reported by the last attempt.
        source: Box<Error>,
    },

    /// The resolved accessor lacks the capability an operation needs.
    #[error("{operation} is not supported for {kind}")]
    Unsupported {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Resource kind the accessor serves.
        kind: ResourceKind,
    },

    /// A required collaborator is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The renderer failed or produced a malformed row.
    #[error("render failed for {id:?}: {message}")]
    Render {
        /// Identity of the offending row, when known.
        id: String,
        /// Description of the failure.
        message: String,
    },

    /// A sort was requested on a column the header does not carry.
    #[error("unknown column {0:?}")]
    UnknownColumn(String),

    /// The call context was cancelled.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a new render error.
    pub fn render(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates a new unsupported operation error.
    pub fn unsupported(operation: &'static str, kind: &ResourceKind) -> Self {
        Self::Unsupported {
            operation,
            kind: kind.clone(),
        }
    }

    /// Returns `true` if this error ended a scheduler run.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::RetryExhausted { .. })
    }
}
