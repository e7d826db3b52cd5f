//! Row decoding shared by the SQL stores.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::{Comment, ImageLocation, Post};
use crate::storage::{Result, StorageError};

pub(super) fn parse_id(raw: &str) -> Result<Uuid> {
    Ok(Uuid::try_parse(raw)?)
}

pub(super) fn parse_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or(StorageError::InvalidTimestamp(micros))
}

pub(super) fn parse_count(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or(0)
}

/// Map a unique-key violation to `AlreadyExists`.
pub(super) fn on_unique(entity: &'static str) -> impl FnOnce(sqlx::Error) -> StorageError {
    move |e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StorageError::AlreadyExists { entity }
        }
        _ => StorageError::Database(e),
    }
}

/// Decode a row selected with the `posts` columns.
pub(super) fn decode_post<R>(row: &R) -> Result<Post>
where
    R: sqlx::Row,
    for<'r> String: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    for<'r> i64: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    for<'a> &'a str: sqlx::ColumnIndex<R>,
{
    Post::try_from(PostRow {
        id: row.try_get("id")?,
        author_id: row.try_get("author_id")?,
        body: row.try_get("body")?,
        images: row.try_get("images")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Decode a row selected with the `comments` columns.
pub(super) fn decode_comment<R>(row: &R) -> Result<Comment>
where
    R: sqlx::Row,
    for<'r> String: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    for<'r> i64: sqlx::Decode<'r, R::Database> + sqlx::Type<R::Database>,
    for<'a> &'a str: sqlx::ColumnIndex<R>,
{
    Comment::try_from(CommentRow {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        author_id: row.try_get("author_id")?,
        body: row.try_get("body")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Columns of a `posts` row, in select order.
pub(super) struct PostRow {
    pub id: String,
    pub author_id: String,
    pub body: String,
    pub images: String,
    pub created_at: i64,
}

impl TryFrom<PostRow> for Post {
    type Error = StorageError;

    fn try_from(row: PostRow) -> Result<Self> {
        let images: Vec<ImageLocation> = serde_json::from_str(&row.images)?;
        Ok(Post {
            id: parse_id(&row.id)?,
            author_id: parse_id(&row.author_id)?,
            body: row.body,
            images,
            created_at: parse_micros(row.created_at)?,
            comment_count: None,
            like_count: None,
        })
    }
}

/// Columns of a `comments` row, in select order.
pub(super) struct CommentRow {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub body: String,
    pub created_at: i64,
}

impl TryFrom<CommentRow> for Comment {
    type Error = StorageError;

    fn try_from(row: CommentRow) -> Result<Self> {
        Ok(Comment {
            id: parse_id(&row.id)?,
            post_id: parse_id(&row.post_id)?,
            author_id: parse_id(&row.author_id)?,
            body: row.body,
            created_at: parse_micros(row.created_at)?,
            like_count: None,
        })
    }
}
