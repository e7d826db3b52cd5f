//! FollowGraph trait definition.

use async_trait::async_trait;
use uuid::Uuid;

use super::Result;

/// Who follows whom.
#[async_trait]
pub trait FollowGraph: Send + Sync {
    /// Record that `follower` follows `followed`.
    ///
    /// Self-follows fail with `StorageError::Constraint`; repeated follows
    /// fail with `StorageError::AlreadyExists`.
    async fn follow(&self, follower: Uuid, followed: Uuid) -> Result<()>;

    /// Users followed by `user`, in no particular order.
    async fn followed(&self, user: Uuid) -> Result<Vec<Uuid>>;
}
