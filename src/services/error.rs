//! Service errors.

use uuid::Uuid;

use crate::context::Interrupt;
use crate::pagination::PageError;
use crate::storage::StorageError;

/// Errors returned by the write and lookup services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Post not found: {0}")]
    PostNotFound(Uuid),

    #[error("Comment not found: {0}")]
    CommentNotFound(Uuid),

    #[error("Like already exists")]
    LikeExists,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    Timeout,

    #[error("{operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Page(#[from] PageError),
}

impl ServiceError {
    /// Wrap a storage failure with the operation that produced it.
    pub fn storage(operation: &'static str, source: StorageError) -> Self {
        ServiceError::Storage { operation, source }
    }
}

impl From<Interrupt> for ServiceError {
    fn from(interrupt: Interrupt) -> Self {
        match interrupt {
            Interrupt::Cancelled => ServiceError::Cancelled,
            Interrupt::Timeout => ServiceError::Timeout,
        }
    }
}
