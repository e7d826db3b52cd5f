//! Unified SQL storage implementations.
//!
//! This module provides shared implementations for SQL-based storage backends
//! (PostgreSQL, SQLite). The implementations are parameterized by database type
//! using the `SqlDatabase` trait.

mod comment_store;
mod count_store;
mod follow_graph;
pub(crate) mod keyset;
mod like_store;
mod post_store;
mod query;
mod rows;

pub use comment_store::SqlCommentStore;
pub use count_store::SqlCountStore;
pub use follow_graph::SqlFollowGraph;
pub use like_store::SqlLikeStore;
pub use post_store::SqlPostStore;
pub use query::SqlDatabase;

#[cfg(feature = "postgres")]
pub mod postgres {
    //! PostgreSQL database backend.

    use std::sync::Arc;

    use sea_query::PostgresQueryBuilder;
    use sqlx::PgPool;

    use crate::storage::Stores;

    /// PostgreSQL database marker type.
    pub struct Postgres;

    impl super::SqlDatabase for Postgres {
        type Pool = PgPool;

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }
    }

    pub type PostgresPostStore = super::SqlPostStore<Postgres>;
    pub type PostgresCommentStore = super::SqlCommentStore<Postgres>;
    pub type PostgresLikeStore = super::SqlLikeStore<Postgres>;
    pub type PostgresCountStore = super::SqlCountStore<Postgres>;
    pub type PostgresFollowGraph = super::SqlFollowGraph<Postgres>;

    /// All stores sharing one pool.
    pub fn stores(pool: PgPool) -> Stores {
        Stores {
            posts: Arc::new(PostgresPostStore::new(pool.clone())),
            comments: Arc::new(PostgresCommentStore::new(pool.clone())),
            likes: Arc::new(PostgresLikeStore::new(pool.clone())),
            counts: Arc::new(PostgresCountStore::new(pool.clone())),
            follows: Arc::new(PostgresFollowGraph::new(pool)),
        }
    }
}

#[cfg(feature = "sqlite")]
pub mod sqlite {
    //! SQLite database backend.

    use std::sync::Arc;

    use sea_query::SqliteQueryBuilder;
    use sqlx::SqlitePool;

    use crate::storage::Stores;

    /// SQLite database marker type.
    pub struct Sqlite;

    impl super::SqlDatabase for Sqlite {
        type Pool = SqlitePool;

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }
    }

    pub type SqlitePostStore = super::SqlPostStore<Sqlite>;
    pub type SqliteCommentStore = super::SqlCommentStore<Sqlite>;
    pub type SqliteLikeStore = super::SqlLikeStore<Sqlite>;
    pub type SqliteCountStore = super::SqlCountStore<Sqlite>;
    pub type SqliteFollowGraph = super::SqlFollowGraph<Sqlite>;

    /// All stores sharing one pool.
    pub fn stores(pool: SqlitePool) -> Stores {
        Stores {
            posts: Arc::new(SqlitePostStore::new(pool.clone())),
            comments: Arc::new(SqliteCommentStore::new(pool.clone())),
            likes: Arc::new(SqliteLikeStore::new(pool.clone())),
            counts: Arc::new(SqliteCountStore::new(pool.clone())),
            follows: Arc::new(SqliteFollowGraph::new(pool)),
        }
    }
}
