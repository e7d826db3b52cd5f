//! Likes on posts and comments.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::ServiceError;
use crate::context::RequestContext;
use crate::model::EntityType;
use crate::storage::{CommentStore, LikeStore, PostStore, StorageError, Stores};

/// Records likes after checking the liked entity exists.
pub struct LikeService {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
    likes: Arc<dyn LikeStore>,
}

impl LikeService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            posts: stores.posts.clone(),
            comments: stores.comments.clone(),
            likes: stores.likes.clone(),
        }
    }

    /// Like an entity once per author.
    pub async fn like(
        &self,
        ctx: &RequestContext,
        entity_type: EntityType,
        entity_id: Uuid,
        author_id: Uuid,
    ) -> Result<(), ServiceError> {
        let exists = match entity_type {
            EntityType::Post => ctx.run(self.posts.exists(entity_id)).await?,
            EntityType::Comment => ctx.run(self.comments.exists(entity_id)).await?,
        }
        .map_err(|e| ServiceError::storage("check liked entity", e))?;

        if !exists {
            return Err(match entity_type {
                EntityType::Post => ServiceError::PostNotFound(entity_id),
                EntityType::Comment => ServiceError::CommentNotFound(entity_id),
            });
        }

        ctx.run(self.likes.like(entity_type, entity_id, author_id))
            .await?
            .map_err(|e| match e {
                StorageError::AlreadyExists { .. } => ServiceError::LikeExists,
                other => ServiceError::storage("create like", other),
            })?;

        info!(
            entity_type = %entity_type,
            entity_id = %entity_id,
            author_id = %author_id,
            "Like recorded"
        );
        Ok(())
    }
}
