//! Comment listing and creation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use super::{check_body, counts, ServiceError};
use crate::context::RequestContext;
use crate::model::Comment;
use crate::pagination::{Cursor, Page, PageError, PageRequest, PageSource, Paginator};
use crate::storage::{self, CommentStore, CountStore, PostStore, StorageError, Stores};

/// Comments of one post, newest first.
struct CommentsOfPost<'a> {
    posts: &'a dyn PostStore,
    comments: &'a dyn CommentStore,
    post_id: Uuid,
}

#[async_trait]
impl PageSource for CommentsOfPost<'_> {
    type Item = Comment;

    fn scope(&self) -> String {
        format!("post {}", self.post_id)
    }

    async fn scope_exists(&self) -> storage::Result<bool> {
        self.posts.exists(self.post_id).await
    }

    async fn fetch(
        &self,
        after: Option<&Cursor>,
        fetch_limit: usize,
    ) -> storage::Result<Vec<Comment>> {
        self.comments
            .page_by_post(self.post_id, after, fetch_limit)
            .await
    }
}

pub struct CommentService {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
    counts: Arc<dyn CountStore>,
    paginator: Paginator,
}

impl CommentService {
    pub fn new(stores: &Stores, max_page_size: u32) -> Self {
        Self {
            posts: stores.posts.clone(),
            comments: stores.comments.clone(),
            counts: stores.counts.clone(),
            paginator: Paginator::new(max_page_size),
        }
    }

    /// One page of a post's comments, each with its like count.
    ///
    /// Fails with `ScopeNotFound` if the post does not exist.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        request: PageRequest,
    ) -> Result<Page<Comment>, PageError> {
        let source = CommentsOfPost {
            posts: self.posts.as_ref(),
            comments: self.comments.as_ref(),
            post_id,
        };
        let mut page = self.paginator.page(ctx, &source, &request).await?;
        counts::decorate_comments(ctx, self.counts.as_ref(), &mut page.items).await?;

        debug!(post_id = %post_id, comments = page.items.len(), "Listed comments");
        Ok(page)
    }

    /// Add a comment to a post. The post's comment counter moves with it.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        author_id: Uuid,
        body: &str,
    ) -> Result<Comment, ServiceError> {
        check_body(body, false)?;

        let comment = Comment::new(post_id, author_id, body);
        ctx.run(self.comments.create(&comment))
            .await?
            .map_err(|e| match e {
                StorageError::NotFound { .. } => ServiceError::PostNotFound(post_id),
                other => ServiceError::storage("create comment", other),
            })?;

        info!(comment_id = %comment.id, post_id = %post_id, "Comment created");
        Ok(comment)
    }
}
