//! Keyset scan tests.
//!
//! These verify that `page_by_post` and `page_by_authors` order rows by
//! `(created_at DESC, id ASC)` and resume strictly after a cursor.

use murmur::model::Keyed;
use murmur::pagination::Cursor;
use murmur::storage::Stores;
use uuid::Uuid;

use super::{at, comment_at, post_at, sorted_ids};

async fn seed_post(stores: &Stores) -> Uuid {
    let post = post_at(Uuid::new_v4(), Uuid::new_v4(), 0);
    stores.posts.create(&post).await.expect("create post");
    post.id
}

// =============================================================================
// CommentStore::page_by_post
// =============================================================================

pub async fn test_comments_newest_first(stores: &Stores) {
    let post = seed_post(stores).await;
    let ids = sorted_ids(3);
    for (offset, id) in ids.iter().enumerate() {
        stores
            .comments
            .create(&comment_at(*id, post, offset as i64))
            .await
            .unwrap();
    }

    let page = stores.comments.page_by_post(post, None, 10).await.unwrap();
    let got: Vec<Uuid> = page.iter().map(|c| c.id).collect();
    assert_eq!(got, vec![ids[2], ids[1], ids[0]]);
    assert_eq!(page[0].created_at, at(2));
    assert_eq!(page[0].post_id, post);
}

pub async fn test_equal_timestamps_order_by_id(stores: &Stores) {
    let post = seed_post(stores).await;
    let ids = sorted_ids(3);
    // A = (10, larger id), B = (10, smaller id), C = (5, any id).
    let (b, a, c) = (ids[0], ids[1], ids[2]);
    for (id, micros) in [(a, 10), (b, 10), (c, 5)] {
        stores
            .comments
            .create(&comment_at(id, post, micros))
            .await
            .unwrap();
    }

    let first = stores.comments.page_by_post(post, None, 2).await.unwrap();
    assert_eq!(first.iter().map(|c| c.id).collect::<Vec<_>>(), vec![b, a]);

    let cursor = first[1].cursor();
    assert_eq!(cursor, Cursor::new(at(10), a));
    let rest = stores
        .comments
        .page_by_post(post, Some(&cursor), 2)
        .await
        .unwrap();
    assert_eq!(rest.iter().map(|c| c.id).collect::<Vec<_>>(), vec![c]);
}

pub async fn test_cursor_chain_is_complete(stores: &Stores) {
    let post = seed_post(stores).await;
    let ids = sorted_ids(12);
    for (n, id) in ids.iter().enumerate() {
        // Four timestamps, three comments each.
        stores
            .comments
            .create(&comment_at(*id, post, (n % 4) as i64))
            .await
            .unwrap();
    }

    let mut expected: Vec<(i64, Uuid)> = ids
        .iter()
        .enumerate()
        .map(|(n, id)| ((n % 4) as i64, *id))
        .collect();
    expected.sort_by(|x, y| y.0.cmp(&x.0).then(x.1.cmp(&y.1)));
    let expected: Vec<Uuid> = expected.into_iter().map(|(_, id)| id).collect();

    let mut seen = Vec::new();
    let mut cursor: Option<Cursor> = None;
    loop {
        let rows = stores
            .comments
            .page_by_post(post, cursor.as_ref(), 5)
            .await
            .unwrap();
        seen.extend(rows.iter().take(4).map(|c| c.id));
        if rows.len() <= 4 {
            break;
        }
        cursor = Some(rows[3].cursor());
    }
    assert_eq!(seen, expected);
}

pub async fn test_newer_insert_mid_chain(stores: &Stores) {
    let post = seed_post(stores).await;
    let ids = sorted_ids(4);
    for (n, id) in ids.iter().enumerate() {
        stores
            .comments
            .create(&comment_at(*id, post, 40 - 10 * n as i64))
            .await
            .unwrap();
    }

    let first = stores.comments.page_by_post(post, None, 3).await.unwrap();
    assert_eq!(first.iter().map(|c| c.id).collect::<Vec<_>>(), ids[..3]);
    let cursor = first[1].cursor();

    stores
        .comments
        .create(&comment_at(Uuid::new_v4(), post, 100))
        .await
        .unwrap();

    let rest = stores
        .comments
        .page_by_post(post, Some(&cursor), 3)
        .await
        .unwrap();
    assert_eq!(rest.iter().map(|c| c.id).collect::<Vec<_>>(), ids[2..]);
}

pub async fn test_comments_scoped_to_post(stores: &Stores) {
    let post = seed_post(stores).await;
    let other = seed_post(stores).await;
    stores
        .comments
        .create(&comment_at(Uuid::new_v4(), other, 1))
        .await
        .unwrap();

    assert!(stores
        .comments
        .page_by_post(post, None, 10)
        .await
        .unwrap()
        .is_empty());
}

// =============================================================================
// PostStore::page_by_authors
// =============================================================================

pub async fn test_posts_by_authors(stores: &Stores) {
    let (alice, bob, carol) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let ids = sorted_ids(4);
    let posts = [
        post_at(ids[0], alice, 30),
        post_at(ids[1], bob, 20),
        post_at(ids[2], carol, 25),
        post_at(ids[3], bob, 30),
    ];
    for post in &posts {
        stores.posts.create(post).await.unwrap();
    }

    let rows = stores
        .posts
        .page_by_authors(&[alice, bob], None, 10)
        .await
        .unwrap();
    let got: Vec<Uuid> = rows.iter().map(|p| p.id).collect();
    assert_eq!(got, vec![ids[0], ids[3], ids[1]]);

    let after = rows[1].cursor();
    let rows = stores
        .posts
        .page_by_authors(&[alice, bob], Some(&after), 10)
        .await
        .unwrap();
    assert_eq!(rows.iter().map(|p| p.id).collect::<Vec<_>>(), vec![ids[1]]);

    assert!(stores
        .posts
        .page_by_authors(&[], None, 10)
        .await
        .unwrap()
        .is_empty());
}

#[macro_export]
macro_rules! run_keyset_tests {
    ($stores:expr) => {
        use $crate::storage::keyset_tests::*;

        test_comments_newest_first($stores).await;
        println!("  test_comments_newest_first: PASSED");

        test_equal_timestamps_order_by_id($stores).await;
        println!("  test_equal_timestamps_order_by_id: PASSED");

        test_cursor_chain_is_complete($stores).await;
        println!("  test_cursor_chain_is_complete: PASSED");

        test_newer_insert_mid_chain($stores).await;
        println!("  test_newer_insert_mid_chain: PASSED");

        test_comments_scoped_to_post($stores).await;
        println!("  test_comments_scoped_to_post: PASSED");

        test_posts_by_authors($stores).await;
        println!("  test_posts_by_authors: PASSED");
    };
}
