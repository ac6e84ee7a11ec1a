//! Accessor error types

use crate::resource::ResourceKind;

/// Errors an accessor reports when talking to the resource store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// The requested resource or collection does not exist.
    #[error("{kind} {path:?} not found")]
    NotFound {
        /// Resource kind that was queried.
        kind: ResourceKind,
        /// Fully qualified path, or the namespace for list calls.
        path: String,
    },

    /// The caller is not allowed to read the resource.
    #[error("access to {kind} forbidden: {message}")]
    Forbidden {
        /// Resource kind that was queried.
        kind: ResourceKind,
        /// Message returned by the store.
        message: String,
    },

    /// The store could not be reached or answered garbage.
    #[error("transport error: {0}")]
    Transport(String),

    /// The call observed a cancelled context and gave up.
    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// Creates a new not found error.
    pub fn not_found(kind: &ResourceKind, path: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.clone(),
            path: path.into(),
        }
    }

    /// Creates a new forbidden error.
    pub fn forbidden(kind: &ResourceKind, message: impl Into<String>) -> Self {
        Self::Forbidden {
            kind: kind.clone(),
            message: message.into(),
        }
    }

    /// Creates a new transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Returns `true` if another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
