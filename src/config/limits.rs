//! Page-size bounds and request deadlines.
//!
//! Each listing has its own maximum page size. Services receive these
//! values at construction; nothing reads them from global state.

use std::time::Duration;

use serde::Deserialize;

/// Default maximum comments per page.
pub const DEFAULT_COMMENTS_MAX_PAGE_SIZE: u32 = 100;

/// Default maximum posts per feed page.
pub const DEFAULT_FEED_MAX_PAGE_SIZE: u32 = 50;

/// Default per-request deadline in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Maximum page sizes per listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Maximum `limit` accepted when listing a post's comments.
    pub comments_max_page_size: u32,
    /// Maximum `limit` accepted when listing a feed.
    pub feed_max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            comments_max_page_size: DEFAULT_COMMENTS_MAX_PAGE_SIZE,
            feed_max_page_size: DEFAULT_FEED_MAX_PAGE_SIZE,
        }
    }
}

/// Per-request settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Deadline applied to every request's store calls.
    pub timeout_ms: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl RequestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
