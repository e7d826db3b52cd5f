//! Paginated query engine.

use async_trait::async_trait;
use tracing::debug;

use super::{Cursor, Page, PageError, PageRequest};
use crate::context::RequestContext;
use crate::model::Keyed;
use crate::storage::Result;

/// A scope-filtered, ordered range scan over one entity type.
///
/// Implementations bind the scope (a parent id, a set of author ids) at
/// construction and map rows to items. `fetch` must return at most
/// `fetch_limit` items strictly after `after`, ordered by
/// `(created_at DESC, id ASC)`.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Keyed + Send;

    /// Human-readable scope, used in logs and `ScopeNotFound`.
    fn scope(&self) -> String;

    /// Whether the scope itself exists. Empty-but-valid scopes return `true`.
    async fn scope_exists(&self) -> Result<bool> {
        Ok(true)
    }

    async fn fetch(&self, after: Option<&Cursor>, fetch_limit: usize) -> Result<Vec<Self::Item>>;
}

/// Keyset paginator bounded by a configured maximum page size.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    max_page_size: u32,
}

impl Paginator {
    pub fn new(max_page_size: u32) -> Self {
        Self { max_page_size }
    }

    /// Check `1 <= limit <= max_page_size`.
    pub fn validate(&self, limit: u32) -> std::result::Result<usize, PageError> {
        if limit == 0 || limit > self.max_page_size {
            return Err(PageError::InvalidLimit {
                limit,
                max: self.max_page_size,
            });
        }
        Ok(limit as usize)
    }

    /// Fetch one page from `source`.
    ///
    /// One row beyond `limit` is requested; its presence is what decides
    /// whether a next cursor is returned, so no count query is needed.
    pub async fn page<S: PageSource>(
        &self,
        ctx: &RequestContext,
        source: &S,
        request: &PageRequest,
    ) -> std::result::Result<Page<S::Item>, PageError> {
        let limit = self.validate(request.limit)?;

        let exists = ctx
            .run(source.scope_exists())
            .await?
            .map_err(|e| PageError::storage("check page scope", e))?;
        if !exists {
            return Err(PageError::ScopeNotFound(source.scope()));
        }

        let rows = ctx
            .run(source.fetch(request.cursor.as_ref(), limit + 1))
            .await?
            .map_err(|e| PageError::storage("fetch page", e))?;

        let page = split_page(rows, limit);
        debug!(
            scope = %source.scope(),
            limit = limit,
            items = page.items.len(),
            has_next = page.next_cursor.is_some(),
            "Fetched page"
        );
        Ok(page)
    }
}

/// Keep the first `limit` rows; a surplus row means another page exists.
fn split_page<T: Keyed>(mut rows: Vec<T>, limit: usize) -> Page<T> {
    let has_more = rows.len() > limit;
    rows.truncate(limit);
    let next_cursor = if has_more {
        rows.last().map(Keyed::cursor)
    } else {
        None
    };
    Page {
        items: rows,
        next_cursor,
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
