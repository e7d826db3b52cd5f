//! LikeStore trait definition.

use async_trait::async_trait;
use uuid::Uuid;

use super::Result;
use crate::model::EntityType;

#[async_trait]
pub trait LikeStore: Send + Sync {
    /// Record a like and bump the entity's like counter atomically.
    ///
    /// A second like by the same author on the same entity fails with
    /// `StorageError::AlreadyExists` and leaves the counter untouched.
    /// Entity existence is the caller's concern.
    async fn like(&self, entity_type: EntityType, entity_id: Uuid, author_id: Uuid) -> Result<()>;
}
