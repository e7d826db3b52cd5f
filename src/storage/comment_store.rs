//! CommentStore trait definition.

use async_trait::async_trait;
use uuid::Uuid;

use super::Result;
use crate::model::Comment;
use crate::pagination::Cursor;

/// Interface for comment persistence and per-post range scans.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Insert a comment and bump its post's comment counter atomically.
    ///
    /// Fails with `StorageError::NotFound` if the post does not exist.
    async fn create(&self, comment: &Comment) -> Result<()>;

    async fn exists(&self, id: Uuid) -> Result<bool>;

    /// Comments on `post_id` strictly after `after`, ordered by
    /// `(created_at DESC, id ASC)`, at most `fetch_limit` rows.
    async fn page_by_post(
        &self,
        post_id: Uuid,
        after: Option<&Cursor>,
        fetch_limit: usize,
    ) -> Result<Vec<Comment>>;
}
