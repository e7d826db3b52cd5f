//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.
//! Ids are stored as hyphenated lowercase UUID text, whose byte order matches
//! `Uuid`'s `Ord`. Timestamps are stored as microseconds since the epoch.

use sea_query::Iden;

/// Posts table schema.
#[derive(Iden, Clone, Copy)]
pub enum Posts {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "author_id"]
    AuthorId,
    #[iden = "body"]
    Body,
    #[iden = "images"]
    Images,
    #[iden = "created_at"]
    CreatedAt,
}

/// Comments table schema.
#[derive(Iden, Clone, Copy)]
pub enum Comments {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "post_id"]
    PostId,
    #[iden = "author_id"]
    AuthorId,
    #[iden = "body"]
    Body,
    #[iden = "created_at"]
    CreatedAt,
}

/// Likes table schema. Unique per `(entity_type, entity_id, author_id)`.
#[derive(Iden, Clone, Copy)]
pub enum Likes {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "entity_type"]
    EntityType,
    #[iden = "entity_id"]
    EntityId,
    #[iden = "author_id"]
    AuthorId,
}

/// Like counters keyed by `(entity_type, entity_id)`.
#[derive(Iden, Clone, Copy)]
pub enum LikesCount {
    Table,
    #[iden = "entity_type"]
    EntityType,
    #[iden = "entity_id"]
    EntityId,
    #[iden = "count"]
    Count,
}

/// Comment counters keyed by post.
#[derive(Iden, Clone, Copy)]
pub enum CommentsCount {
    Table,
    #[iden = "post_id"]
    PostId,
    #[iden = "count"]
    Count,
}

/// Follow edges.
#[derive(Iden, Clone, Copy)]
pub enum Follows {
    Table,
    #[iden = "follower_id"]
    FollowerId,
    #[iden = "followed_id"]
    FollowedId,
    #[iden = "created_at"]
    CreatedAt,
}
