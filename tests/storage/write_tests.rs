//! Write path tests: creates, likes, counters and follows.

use murmur::model::{CountKind, EntityType, ImageLocation};
use murmur::storage::{StorageError, Stores};
use uuid::Uuid;

use super::{comment_at, post_at};

pub async fn test_post_round_trip(stores: &Stores) {
    let mut post = post_at(Uuid::new_v4(), Uuid::new_v4(), 42);
    post.images = vec![ImageLocation {
        bucket: "media".to_string(),
        key: "a/b.png".to_string(),
    }];
    stores.posts.create(&post).await.unwrap();

    let loaded = stores.posts.get(post.id).await.unwrap().expect("post exists");
    assert_eq!(loaded, post);
    assert!(stores.posts.exists(post.id).await.unwrap());
    assert!(stores.posts.get(Uuid::new_v4()).await.unwrap().is_none());
    assert!(!stores.posts.exists(Uuid::new_v4()).await.unwrap());
}

pub async fn test_comment_on_missing_post(stores: &Stores) {
    let missing = Uuid::new_v4();
    let err = stores
        .comments
        .create(&comment_at(Uuid::new_v4(), missing, 1))
        .await
        .unwrap_err();
    assert!(
        matches!(err, StorageError::NotFound { entity: "post", id } if id == missing),
        "{err:?}"
    );
    assert_eq!(
        stores
            .counts
            .get_count(CountKind::PostComments, missing)
            .await
            .unwrap(),
        0
    );
}

pub async fn test_comment_count_tracks_creates(stores: &Stores) {
    let post = post_at(Uuid::new_v4(), Uuid::new_v4(), 0);
    stores.posts.create(&post).await.unwrap();
    for n in 0..3 {
        stores
            .comments
            .create(&comment_at(Uuid::new_v4(), post.id, n))
            .await
            .unwrap();
    }

    let count = stores
        .counts
        .get_count(CountKind::PostComments, post.id)
        .await
        .unwrap();
    assert_eq!(count, 3);
}

pub async fn test_likes_are_unique_and_counted(stores: &Stores) {
    let post = post_at(Uuid::new_v4(), Uuid::new_v4(), 0);
    stores.posts.create(&post).await.unwrap();
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

    stores.likes.like(EntityType::Post, post.id, alice).await.unwrap();
    stores.likes.like(EntityType::Post, post.id, bob).await.unwrap();
    let err = stores
        .likes
        .like(EntityType::Post, post.id, alice)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::AlreadyExists { entity: "like" }), "{err:?}");

    let count = stores
        .counts
        .get_count(CountKind::PostLikes, post.id)
        .await
        .unwrap();
    assert_eq!(count, 2);

    // Same id under the other entity type is a separate counter.
    let count = stores
        .counts
        .get_count(CountKind::CommentLikes, post.id)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

pub async fn test_batched_counts(stores: &Stores) {
    let post = post_at(Uuid::new_v4(), Uuid::new_v4(), 0);
    stores.posts.create(&post).await.unwrap();
    let liked = comment_at(Uuid::new_v4(), post.id, 1);
    let quiet = comment_at(Uuid::new_v4(), post.id, 2);
    stores.comments.create(&liked).await.unwrap();
    stores.comments.create(&quiet).await.unwrap();
    stores
        .likes
        .like(EntityType::Comment, liked.id, Uuid::new_v4())
        .await
        .unwrap();

    let counts = stores
        .counts
        .get_counts(CountKind::CommentLikes, &[liked.id, quiet.id])
        .await
        .unwrap();
    assert_eq!(counts.get(&liked.id), Some(&1));
    assert_eq!(counts.get(&quiet.id).copied().unwrap_or(0), 0);

    assert!(stores
        .counts
        .get_counts(CountKind::CommentLikes, &[])
        .await
        .unwrap()
        .is_empty());
}

pub async fn test_follow_graph(stores: &Stores) {
    let (viewer, alice, bob) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    assert!(stores.follows.followed(viewer).await.unwrap().is_empty());

    stores.follows.follow(viewer, alice).await.unwrap();
    stores.follows.follow(viewer, bob).await.unwrap();
    let err = stores.follows.follow(viewer, alice).await.unwrap_err();
    assert!(matches!(err, StorageError::AlreadyExists { .. }), "{err:?}");
    let err = stores.follows.follow(viewer, viewer).await.unwrap_err();
    assert!(matches!(err, StorageError::Constraint(_)), "{err:?}");

    let mut followed = stores.follows.followed(viewer).await.unwrap();
    followed.sort();
    let mut expected = vec![alice, bob];
    expected.sort();
    assert_eq!(followed, expected);
    assert!(stores.follows.followed(alice).await.unwrap().is_empty());
}

#[macro_export]
macro_rules! run_write_tests {
    ($stores:expr) => {
        use $crate::storage::write_tests::*;

        test_post_round_trip($stores).await;
        println!("  test_post_round_trip: PASSED");

        test_comment_on_missing_post($stores).await;
        println!("  test_comment_on_missing_post: PASSED");

        test_comment_count_tracks_creates($stores).await;
        println!("  test_comment_count_tracks_creates: PASSED");

        test_likes_are_unique_and_counted($stores).await;
        println!("  test_likes_are_unique_and_counted: PASSED");

        test_batched_counts($stores).await;
        println!("  test_batched_counts: PASSED");

        test_follow_graph($stores).await;
        println!("  test_follow_graph: PASSED");
    };
}
