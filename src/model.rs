//! Domain records shared by storage, services and handlers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pagination::Cursor;

/// Entity kinds that can be liked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Post,
    Comment,
}

impl EntityType {
    /// Value stored in the `entity_type` columns.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Post => "posts",
            EntityType::Comment => "comments",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Denormalized counters maintained alongside writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountKind {
    /// Likes on a post, keyed by post id.
    PostLikes,
    /// Likes on a comment, keyed by comment id.
    CommentLikes,
    /// Comments on a post, keyed by post id.
    PostComments,
}

impl CountKind {
    /// Like counter for an entity type.
    pub fn likes_of(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Post => CountKind::PostLikes,
            EntityType::Comment => CountKind::CommentLikes,
        }
    }
}

/// Location of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLocation {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub images: Vec<ImageLocation>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
}

impl Post {
    /// Build a new post with a fresh id, stamped with the current time.
    pub fn new(author_id: Uuid, body: impl Into<String>, images: Vec<ImageLocation>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            body: body.into(),
            images,
            created_at: now_micros(),
            comment_count: None,
            like_count: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
}

impl Comment {
    /// Build a new comment with a fresh id, stamped with the current time.
    pub fn new(post_id: Uuid, author_id: Uuid, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            body: body.into(),
            created_at: now_micros(),
            like_count: None,
        }
    }
}

/// Items that occupy a position in the `(created_at DESC, id ASC)` order.
pub trait Keyed {
    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;

    /// Cursor pointing at this item.
    fn cursor(&self) -> Cursor {
        Cursor::new(self.created_at(), self.id())
    }
}

impl Keyed for Post {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Keyed for Comment {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Current time at storage resolution (microseconds).
pub fn now_micros() -> DateTime<Utc> {
    truncate_micros(Utc::now())
}

/// Drop sub-microsecond precision.
pub fn truncate_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(ts.timestamp_micros()).unwrap_or(ts)
}
