//! CountStore trait definition.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use super::Result;
use crate::model::CountKind;

/// Read access to denormalized counters.
///
/// Counters are read at whatever state is committed; a missing counter row
/// reads as zero.
#[async_trait]
pub trait CountStore: Send + Sync {
    async fn get_count(&self, kind: CountKind, entity_id: Uuid) -> Result<u64>;

    /// Counters for several entities at once. Every id in `entity_ids` is
    /// present in the result.
    async fn get_counts(&self, kind: CountKind, entity_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>> {
        let mut counts = HashMap::with_capacity(entity_ids.len());
        for &id in entity_ids {
            counts.insert(id, self.get_count(kind, id).await?);
        }
        Ok(counts)
    }
}
