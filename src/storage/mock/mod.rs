//! Mock storage implementation for testing.
//!
//! [`MockStore`] implements every storage trait over in-memory maps and
//! records how often range scans and counter reads hit it.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    CommentStore, CountStore, FollowGraph, LikeStore, PostStore, Result, StorageError, Stores,
};
use crate::model::{Comment, CountKind, EntityType, Keyed, Post};
use crate::pagination::Cursor;

#[derive(Default)]
struct State {
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    likes: HashSet<(EntityType, Uuid, Uuid)>,
    counts: HashMap<(CountKind, Uuid), u64>,
    follows: HashMap<Uuid, BTreeSet<Uuid>>,
}

/// In-memory store with call counters, failure injection and latency.
#[derive(Default)]
pub struct MockStore {
    state: RwLock<State>,
    post_scans: AtomicUsize,
    comment_scans: AtomicUsize,
    count_reads: AtomicUsize,
    fail_on_read: RwLock<bool>,
    fail_on_write: RwLock<bool>,
    scan_delay: RwLock<Option<Duration>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every store trait backed by this one mock.
    pub fn stores(self: &Arc<Self>) -> Stores {
        Stores {
            posts: self.clone(),
            comments: self.clone(),
            likes: self.clone(),
            counts: self.clone(),
            follows: self.clone(),
        }
    }

    pub async fn set_fail_on_read(&self, fail: bool) {
        *self.fail_on_read.write().await = fail;
    }

    pub async fn set_fail_on_write(&self, fail: bool) {
        *self.fail_on_write.write().await = fail;
    }

    /// Delay every range scan by `delay`.
    pub async fn set_scan_delay(&self, delay: Option<Duration>) {
        *self.scan_delay.write().await = delay;
    }

    /// Number of `PostStore::page_by_authors` calls.
    pub fn post_scans(&self) -> usize {
        self.post_scans.load(Ordering::SeqCst)
    }

    /// Number of `CommentStore::page_by_post` calls.
    pub fn comment_scans(&self) -> usize {
        self.comment_scans.load(Ordering::SeqCst)
    }

    /// Number of `CountStore` calls.
    pub fn count_reads(&self) -> usize {
        self.count_reads.load(Ordering::SeqCst)
    }

    async fn check_read(&self) -> Result<()> {
        if *self.fail_on_read.read().await {
            return Err(StorageError::Unavailable("mock read failure".to_string()));
        }
        Ok(())
    }

    async fn check_write(&self) -> Result<()> {
        if *self.fail_on_write.read().await {
            return Err(StorageError::Unavailable("mock write failure".to_string()));
        }
        Ok(())
    }

    async fn scan_latency(&self) {
        let delay = *self.scan_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Same predicate and order as the SQL keyset scan.
fn scan<'a, T>(items: impl Iterator<Item = &'a T>, after: Option<&Cursor>, limit: usize) -> Vec<T>
where
    T: Keyed + Clone + 'a,
{
    let mut rows: Vec<T> = items
        .filter(|item| match after {
            None => true,
            Some(c) => {
                item.created_at() < c.created_at
                    || (item.created_at() == c.created_at && item.id() > c.id)
            }
        })
        .cloned()
        .collect();
    rows.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });
    rows.truncate(limit);
    rows
}

#[async_trait]
impl PostStore for MockStore {
    async fn create(&self, post: &Post) -> Result<()> {
        self.check_write().await?;
        let mut state = self.state.write().await;
        if state.posts.contains_key(&post.id) {
            return Err(StorageError::AlreadyExists { entity: "post" });
        }
        let mut stored = post.clone();
        stored.comment_count = None;
        stored.like_count = None;
        state.posts.insert(post.id, stored);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>> {
        self.check_read().await?;
        Ok(self.state.read().await.posts.get(&id).cloned())
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        self.check_read().await?;
        Ok(self.state.read().await.posts.contains_key(&id))
    }

    async fn page_by_authors(
        &self,
        authors: &[Uuid],
        after: Option<&Cursor>,
        fetch_limit: usize,
    ) -> Result<Vec<Post>> {
        self.post_scans.fetch_add(1, Ordering::SeqCst);
        self.check_read().await?;
        self.scan_latency().await;

        let state = self.state.read().await;
        Ok(scan(
            state.posts.values().filter(|p| authors.contains(&p.author_id)),
            after,
            fetch_limit,
        ))
    }
}

#[async_trait]
impl CommentStore for MockStore {
    async fn create(&self, comment: &Comment) -> Result<()> {
        self.check_write().await?;
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&comment.post_id) {
            return Err(StorageError::NotFound {
                entity: "post",
                id: comment.post_id,
            });
        }
        if state.comments.contains_key(&comment.id) {
            return Err(StorageError::AlreadyExists { entity: "comment" });
        }
        let mut stored = comment.clone();
        stored.like_count = None;
        state.comments.insert(comment.id, stored);
        *state
            .counts
            .entry((CountKind::PostComments, comment.post_id))
            .or_default() += 1;
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        self.check_read().await?;
        Ok(self.state.read().await.comments.contains_key(&id))
    }

    async fn page_by_post(
        &self,
        post_id: Uuid,
        after: Option<&Cursor>,
        fetch_limit: usize,
    ) -> Result<Vec<Comment>> {
        self.comment_scans.fetch_add(1, Ordering::SeqCst);
        self.check_read().await?;
        self.scan_latency().await;

        let state = self.state.read().await;
        Ok(scan(
            state.comments.values().filter(|c| c.post_id == post_id),
            after,
            fetch_limit,
        ))
    }
}

#[async_trait]
impl LikeStore for MockStore {
    async fn like(&self, entity_type: EntityType, entity_id: Uuid, author_id: Uuid) -> Result<()> {
        self.check_write().await?;
        let mut state = self.state.write().await;
        if !state.likes.insert((entity_type, entity_id, author_id)) {
            return Err(StorageError::AlreadyExists { entity: "like" });
        }
        *state
            .counts
            .entry((CountKind::likes_of(entity_type), entity_id))
            .or_default() += 1;
        Ok(())
    }
}

#[async_trait]
impl CountStore for MockStore {
    async fn get_count(&self, kind: CountKind, entity_id: Uuid) -> Result<u64> {
        self.count_reads.fetch_add(1, Ordering::SeqCst);
        self.check_read().await?;
        let state = self.state.read().await;
        Ok(state.counts.get(&(kind, entity_id)).copied().unwrap_or(0))
    }

    async fn get_counts(&self, kind: CountKind, entity_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>> {
        self.count_reads.fetch_add(1, Ordering::SeqCst);
        self.check_read().await?;
        let state = self.state.read().await;
        Ok(entity_ids
            .iter()
            .map(|&id| (id, state.counts.get(&(kind, id)).copied().unwrap_or(0)))
            .collect())
    }
}

#[async_trait]
impl FollowGraph for MockStore {
    async fn follow(&self, follower: Uuid, followed: Uuid) -> Result<()> {
        self.check_write().await?;
        if follower == followed {
            return Err(StorageError::Constraint(
                "a user cannot follow themselves".to_string(),
            ));
        }
        let mut state = self.state.write().await;
        if !state.follows.entry(follower).or_default().insert(followed) {
            return Err(StorageError::AlreadyExists { entity: "follow" });
        }
        Ok(())
    }

    async fn followed(&self, user: Uuid) -> Result<Vec<Uuid>> {
        self.check_read().await?;
        let state = self.state.read().await;
        Ok(state
            .follows
            .get(&user)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }
}
