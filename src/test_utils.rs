//! Fixtures for unit tests.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::{Comment, Post};

/// Timestamp `micros` microseconds after the epoch.
pub fn at(micros: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(micros).unwrap()
}

/// Small, readable ids whose order follows `n`.
pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn post_at(id: Uuid, author_id: Uuid, micros: i64) -> Post {
    Post {
        id,
        author_id,
        body: format!("post {id}"),
        images: vec![],
        created_at: at(micros),
        comment_count: None,
        like_count: None,
    }
}

pub fn comment_at(id: Uuid, post_id: Uuid, micros: i64) -> Comment {
    Comment {
        id,
        post_id,
        author_id: Uuid::from_u128(0xfeed),
        body: format!("comment {id}"),
        created_at: at(micros),
        like_count: None,
    }
}
