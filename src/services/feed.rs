//! Feed assembly.
//!
//! A viewer's feed is the posts of everyone they follow, paged with the same
//! keyset engine as comment listings and decorated with counts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::counts;
use crate::context::RequestContext;
use crate::model::Post;
use crate::pagination::{Cursor, Page, PageError, PageRequest, PageSource, Paginator};
use crate::storage::{self, CountStore, FollowGraph, PostStore, Stores};

/// Posts written by any of a fixed, non-empty set of authors.
struct PostsByAuthors<'a> {
    posts: &'a dyn PostStore,
    authors: &'a [Uuid],
}

#[async_trait]
impl PageSource for PostsByAuthors<'_> {
    type Item = Post;

    fn scope(&self) -> String {
        format!("{} followed authors", self.authors.len())
    }

    async fn fetch(&self, after: Option<&Cursor>, fetch_limit: usize) -> storage::Result<Vec<Post>> {
        self.posts
            .page_by_authors(self.authors, after, fetch_limit)
            .await
    }
}

pub struct FeedService {
    follows: Arc<dyn FollowGraph>,
    posts: Arc<dyn PostStore>,
    counts: Arc<dyn CountStore>,
    paginator: Paginator,
}

impl FeedService {
    pub fn new(stores: &Stores, max_page_size: u32) -> Self {
        Self {
            follows: stores.follows.clone(),
            posts: stores.posts.clone(),
            counts: stores.counts.clone(),
            paginator: Paginator::new(max_page_size),
        }
    }

    /// One page of `viewer`'s feed.
    ///
    /// Viewers who follow nobody get an empty page without any post query.
    pub async fn feed(
        &self,
        ctx: &RequestContext,
        viewer: Uuid,
        request: PageRequest,
    ) -> Result<Page<Post>, PageError> {
        self.paginator.validate(request.limit)?;

        let authors = ctx
            .run(self.follows.followed(viewer))
            .await?
            .map_err(|e| PageError::storage("resolve followed users", e))?;
        if authors.is_empty() {
            debug!(viewer = %viewer, "Viewer follows nobody, feed is empty");
            return Ok(Page::empty());
        }

        let source = PostsByAuthors {
            posts: self.posts.as_ref(),
            authors: &authors,
        };
        let mut page = self.paginator.page(ctx, &source, &request).await?;
        counts::decorate_posts(ctx, self.counts.as_ref(), &mut page.items).await?;

        debug!(
            viewer = %viewer,
            authors = authors.len(),
            posts = page.items.len(),
            "Assembled feed"
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::model::EntityType;
    use crate::storage::mock::MockStore;
    use crate::storage::{CommentStore, LikeStore};
    use crate::test_utils::{comment_at, id, post_at};

    const VIEWER: u128 = 0x99;

    async fn setup() -> (Arc<MockStore>, FeedService) {
        let store = Arc::new(MockStore::new());
        let service = FeedService::new(&store.stores(), 50);
        (store, service)
    }

    #[tokio::test]
    async fn test_empty_follow_set_issues_no_post_query() {
        let (store, service) = setup().await;
        PostStore::create(store.as_ref(), &post_at(id(1), id(2), 1))
            .await
            .unwrap();

        let page = service
            .feed(&RequestContext::background(), id(VIEWER), PageRequest::first(10))
            .await
            .unwrap();

        assert_eq!(page, Page::empty());
        assert_eq!(store.post_scans(), 0);
        assert_eq!(store.count_reads(), 0);
    }

    #[tokio::test]
    async fn test_feed_only_includes_followed_authors() {
        let (store, service) = setup().await;
        store.follow(id(VIEWER), id(2)).await.unwrap();
        store.follow(id(VIEWER), id(3)).await.unwrap();
        for (post, author, micros) in [(10, 2, 1), (11, 3, 3), (12, 4, 2), (13, 2, 4)] {
            PostStore::create(store.as_ref(), &post_at(id(post), id(author), micros))
                .await
                .unwrap();
        }

        let page = service
            .feed(&RequestContext::background(), id(VIEWER), PageRequest::first(10))
            .await
            .unwrap();

        let ids: Vec<_> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![id(13), id(11), id(10)]);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_feed_attaches_counts() {
        let (store, service) = setup().await;
        store.follow(id(VIEWER), id(2)).await.unwrap();
        PostStore::create(store.as_ref(), &post_at(id(10), id(2), 1))
            .await
            .unwrap();
        CommentStore::create(store.as_ref(), &comment_at(id(20), id(10), 2))
            .await
            .unwrap();
        store.like(EntityType::Post, id(10), id(VIEWER)).await.unwrap();

        let page = service
            .feed(&RequestContext::background(), id(VIEWER), PageRequest::first(1))
            .await
            .unwrap();

        assert_eq!(page.items[0].comment_count, Some(1));
        assert_eq!(page.items[0].like_count, Some(1));
    }

    #[tokio::test]
    async fn test_feed_pages_across_authors() {
        let (store, service) = setup().await;
        store.follow(id(VIEWER), id(2)).await.unwrap();
        store.follow(id(VIEWER), id(3)).await.unwrap();
        for n in 0..7u128 {
            let author = if n % 2 == 0 { 2 } else { 3 };
            PostStore::create(store.as_ref(), &post_at(id(100 + n), id(author), 5))
                .await
                .unwrap();
        }
        let ctx = RequestContext::background();

        let mut seen = Vec::new();
        let mut request = PageRequest::first(3);
        loop {
            let page = service.feed(&ctx, id(VIEWER), request).await.unwrap();
            seen.extend(page.items.iter().map(|p| p.id));
            match page.next_cursor {
                Some(cursor) => request = PageRequest::after(cursor, 3),
                None => break,
            }
        }
        assert_eq!(seen, (0..7u128).map(|n| id(100 + n)).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_invalid_limit_checked_before_follow_lookup() {
        let (store, service) = setup().await;
        store.set_fail_on_read(true).await;
        let err = service
            .feed(&RequestContext::background(), id(VIEWER), PageRequest::first(51))
            .await
            .unwrap_err();
        assert!(matches!(err, PageError::InvalidLimit { limit: 51, max: 50 }));
    }

    #[tokio::test]
    async fn test_follow_lookup_failure_is_wrapped() {
        let (store, service) = setup().await;
        store.set_fail_on_read(true).await;
        let err = service
            .feed(&RequestContext::background(), id(VIEWER), PageRequest::first(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PageError::Storage {
                operation: "resolve followed users",
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_times_out() {
        let (store, service) = setup().await;
        store.follow(id(VIEWER), id(2)).await.unwrap();
        store.set_scan_delay(Some(Duration::from_secs(10))).await;

        let ctx = RequestContext::with_timeout(Duration::from_secs(1));
        let err = service
            .feed(&ctx, id(VIEWER), PageRequest::first(5))
            .await
            .unwrap_err();
        assert!(matches!(err, PageError::Timeout));
    }
}
