//! Murmur - posts, comments and feeds
//!
//! A small social service whose listings are read through keyset
//! pagination: every page is ordered by `(created_at DESC, id ASC)` and
//! continued from an opaque `(timestamp, id)` cursor.

pub mod config;
pub mod context;
pub mod handlers;
pub mod model;
pub mod pagination;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod test_utils;
