//! PostStore trait definition.

use async_trait::async_trait;
use uuid::Uuid;

use super::Result;
use crate::model::Post;
use crate::pagination::Cursor;

/// Interface for post persistence and feed range scans.
///
/// # Implementations
///
/// - `SqlPostStore<Sqlite>` / `SqlPostStore<Postgres>`
/// - `MockStore`: in-memory mock for testing
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a new post. Counts on `post` are ignored.
    async fn create(&self, post: &Post) -> Result<()>;

    /// Load a post without counts. `None` if absent.
    async fn get(&self, id: Uuid) -> Result<Option<Post>>;

    async fn exists(&self, id: Uuid) -> Result<bool>;

    /// Posts written by any of `authors`, strictly after `after`, ordered by
    /// `(created_at DESC, id ASC)`, at most `fetch_limit` rows.
    async fn page_by_authors(
        &self,
        authors: &[Uuid],
        after: Option<&Cursor>,
        fetch_limit: usize,
    ) -> Result<Vec<Post>>;
}
