//! Count decoration for listed items.
//!
//! One batched lookup per count kind per page. Counts are read at whatever
//! state is committed and may lag the items they decorate.

use uuid::Uuid;

use crate::context::RequestContext;
use crate::model::{Comment, CountKind, Post};
use crate::pagination::PageError;
use crate::storage::CountStore;

async fn load(
    ctx: &RequestContext,
    counts: &dyn CountStore,
    kind: CountKind,
    ids: &[Uuid],
) -> Result<std::collections::HashMap<Uuid, u64>, PageError> {
    ctx.run(counts.get_counts(kind, ids))
        .await?
        .map_err(|e| PageError::storage("load counts", e))
}

/// Fill `comment_count` and `like_count` on each post.
pub(crate) async fn decorate_posts(
    ctx: &RequestContext,
    counts: &dyn CountStore,
    posts: &mut [Post],
) -> Result<(), PageError> {
    if posts.is_empty() {
        return Ok(());
    }
    let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
    let comments = load(ctx, counts, CountKind::PostComments, &ids).await?;
    let likes = load(ctx, counts, CountKind::PostLikes, &ids).await?;

    for post in posts {
        post.comment_count = Some(comments.get(&post.id).copied().unwrap_or(0));
        post.like_count = Some(likes.get(&post.id).copied().unwrap_or(0));
    }
    Ok(())
}

/// Fill `like_count` on each comment.
pub(crate) async fn decorate_comments(
    ctx: &RequestContext,
    counts: &dyn CountStore,
    comments: &mut [Comment],
) -> Result<(), PageError> {
    if comments.is_empty() {
        return Ok(());
    }
    let ids: Vec<Uuid> = comments.iter().map(|c| c.id).collect();
    let likes = load(ctx, counts, CountKind::CommentLikes, &ids).await?;

    for comment in comments {
        comment.like_count = Some(likes.get(&comment.id).copied().unwrap_or(0));
    }
    Ok(())
}
