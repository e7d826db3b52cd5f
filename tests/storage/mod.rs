//! Shared storage integration tests.
//!
//! Tests the store traits against every SQL backend. Each backend module
//! builds a [`murmur::storage::Stores`] and runs these test functions.
//! Every test generates its own ids so the functions can share one database.

pub mod keyset_tests;
pub mod write_tests;

use chrono::{DateTime, Utc};
use murmur::model::{Comment, Post};
use uuid::Uuid;

/// Timestamp `micros` microseconds after a fixed base instant.
pub fn at(micros: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(1_700_000_000_000_000 + micros).unwrap()
}

/// `n` fresh ids in ascending order.
pub fn sorted_ids(n: usize) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = (0..n).map(|_| Uuid::new_v4()).collect();
    ids.sort();
    ids
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
        author_id: Uuid::new_v4(),
        body: format!("comment {id}"),
        created_at: at(micros),
        like_count: None,
    }
}
