//! Post creation and lookup.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::{check_body, counts, ServiceError};
use crate::context::RequestContext;
use crate::model::{ImageLocation, Post};
use crate::storage::{CountStore, PostStore, Stores};

pub struct PostService {
    posts: Arc<dyn PostStore>,
    counts: Arc<dyn CountStore>,
}

impl PostService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            posts: stores.posts.clone(),
            counts: stores.counts.clone(),
        }
    }

    /// Publish a post. A post needs a body, at least one image, or both.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        author_id: Uuid,
        body: &str,
        images: Vec<ImageLocation>,
    ) -> Result<Post, ServiceError> {
        check_body(body, !images.is_empty())?;
        if images
            .iter()
            .any(|image| image.bucket.is_empty() || image.key.is_empty())
        {
            return Err(ServiceError::InvalidInput(
                "images: bucket and key are required".to_string(),
            ));
        }

        let post = Post::new(author_id, body, images);
        ctx.run(self.posts.create(&post))
            .await?
            .map_err(|e| ServiceError::storage("create post", e))?;

        info!(post_id = %post.id, author_id = %author_id, "Post created");
        Ok(post)
    }

    /// Load a post with its comment and like counts.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Post, ServiceError> {
        let post = ctx
            .run(self.posts.get(id))
            .await?
            .map_err(|e| ServiceError::storage("get post", e))?
            .ok_or(ServiceError::PostNotFound(id))?;

        let mut posts = [post];
        counts::decorate_posts(ctx, self.counts.as_ref(), &mut posts).await?;
        let [post] = posts;
        Ok(post)
    }
}
