//! Storage traits and backends.
//!
//! Each concern gets its own trait so services depend only on what they
//! read or write. One generic SQL implementation covers SQLite and
//! PostgreSQL; [`mock::MockStore`] implements every trait in memory.

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::config::StorageConfig;

mod comment_store;
mod count_store;
mod follow_graph;
mod like_store;
mod post_store;

pub mod mock;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod schema;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod sql;

pub use comment_store::CommentStore;
pub use count_store::CountStore;
pub use follow_graph::FollowGraph;
pub use like_store::LikeStore;
pub use post_store::PostStore;

pub use crate::config::StorageType;

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{entity} already exists")]
    AlreadyExists { entity: &'static str },

    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("Invalid timestamp: micros={0}")]
    InvalidTimestamp(i64),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(any(feature = "sqlite", feature = "postgres"))]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[cfg(any(feature = "sqlite", feature = "postgres"))]
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// The full set of stores a service process needs.
#[derive(Clone)]
pub struct Stores {
    pub posts: Arc<dyn PostStore>,
    pub comments: Arc<dyn CommentStore>,
    pub likes: Arc<dyn LikeStore>,
    pub counts: Arc<dyn CountStore>,
    pub follows: Arc<dyn FollowGraph>,
}

/// Connect to the configured backend and apply pending migrations.
pub async fn init_storage(config: &StorageConfig) -> std::result::Result<Stores, Box<dyn std::error::Error>> {
    match config.storage_type {
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

            info!(path = %config.sqlite.path, "Storage: sqlite");

            if let Some(parent) = std::path::Path::new(&config.sqlite.path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }

            let options = SqliteConnectOptions::new()
                .filename(&config.sqlite.path)
                .create_if_missing(true)
                .foreign_keys(true);
            let pool = SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options)
                .await?;

            sqlx::migrate!("migrations/sqlite")
                .run(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(sql::sqlite::stores(pool))
        }
        #[cfg(feature = "postgres")]
        StorageType::Postgres => {
            use sqlx::postgres::PgPoolOptions;

            info!("Storage: postgres");

            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.postgres.uri)
                .await?;

            sqlx::migrate!("migrations/postgres")
                .run(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(sql::postgres::stores(pool))
        }
        #[allow(unreachable_patterns)]
        other => {
            error!(storage_type = ?other, "Storage backend not compiled in");
            Err(format!("storage type {other:?} requires the matching cargo feature").into())
        }
    }
}
