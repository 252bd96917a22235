//! Error types for store operations.

use thiserror::Error;

use crate::model::{AccountId, PostId};

/// Errors that can occur during account and post store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A required field is missing or invalid on creation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No account exists with the given id.
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),

    /// No post exists with the given id.
    #[error("post not found: {0}")]
    PostNotFound(PostId),

    /// Input could not be decoded into the expected shape.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The backing collection is unusable (e.g. a poisoned lock).
    #[error("internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Returns `true` for the not-found kinds.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AccountNotFound(_) | Self::PostNotFound(_))
    }

    /// Returns `true` for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::MalformedInput(_))
    }

    pub(crate) fn poisoned(which: &str) -> Self {
        Self::Internal(format!("{which} lock poisoned"))
    }
}

/// Convenience type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
