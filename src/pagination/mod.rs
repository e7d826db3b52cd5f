//! Keyset pagination.
//!
//! Pages are ordered by `(created_at DESC, id ASC)`. A [`Cursor`] names the
//! last item a client has seen; the next page holds the items strictly after
//! it in that order:
//!
//! ```text
//! created_at < cursor.created_at
//!     OR (created_at = cursor.created_at AND id > cursor.id)
//! ```
//!
//! `created_at` alone is not unique at storage resolution, so `id` breaks
//! ties. The predicate direction on `id` (`>`) must match the ordering
//! direction on `id` (`ASC`); both live in one place per backend
//! ([`crate::storage::sql::keyset`] and the mock store).
//!
//! The first page carries no cursor at all (`Option::None`), never a
//! zero-valued sentinel.

pub mod cursor;
mod engine;
mod error;

pub use cursor::{Cursor, WireCursor};
pub use engine::{PageSource, Paginator};
pub use error::PageError;

use serde::Serialize;

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Present if and only if more items exist after `items`.
    pub next_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    /// A page with no items and no continuation.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }
}

/// Client-supplied position and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<Cursor>,
    pub limit: u32,
}

impl PageRequest {
    /// Request the first page.
    pub fn first(limit: u32) -> Self {
        Self {
            cursor: None,
            limit,
        }
    }

    /// Request the page after `cursor`.
    pub fn after(cursor: Cursor, limit: u32) -> Self {
        Self {
            cursor: Some(cursor),
            limit,
        }
    }
}
