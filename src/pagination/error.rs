//! Pagination errors.

use crate::context::Interrupt;
use crate::storage::StorageError;

/// Errors returned by the cursor codec and the paginated query engine.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Malformed cursor: {0}")]
    MalformedCursor(String),

    #[error("Invalid limit {limit}: should be in range [1, {max}]")]
    InvalidLimit { limit: u32, max: u32 },

    #[error("Scope not found: {0}")]
    ScopeNotFound(String),

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
}

impl PageError {
    /// Wrap a storage failure with the operation that produced it.
    pub fn storage(operation: &'static str, source: StorageError) -> Self {
        PageError::Storage { operation, source }
    }

    /// True for errors caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PageError::MalformedCursor(_)
                | PageError::InvalidLimit { .. }
                | PageError::ScopeNotFound(_)
        )
    }
}

impl From<Interrupt> for PageError {
    fn from(interrupt: Interrupt) -> Self {
        match interrupt {
            Interrupt::Cancelled => PageError::Cancelled,
            Interrupt::Timeout => PageError::Timeout,
        }
    }
}
