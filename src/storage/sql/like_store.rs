//! Unified SQL LikeStore implementation.

use std::marker::PhantomData;

use super::SqlDatabase;

/// SQL-based implementation of LikeStore.
pub struct SqlLikeStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlLikeStore<DB> {
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

macro_rules! impl_like_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::storage::LikeStore for SqlLikeStore<$db_type> {
            async fn like(
                &self,
                entity_type: crate::model::EntityType,
                entity_id: uuid::Uuid,
                author_id: uuid::Uuid,
            ) -> crate::storage::Result<()> {
                use sea_query::{Expr, OnConflict, Query};

                use crate::storage::schema::{Likes, LikesCount};
                use crate::storage::StorageError;

                let entity_id = entity_id.to_string();
                let mut tx = self.pool.begin().await?;

                // Conflicts on the unique key are skipped rather than raised
                // so the transaction stays usable on PostgreSQL.
                let insert = Query::insert()
                    .into_table(Likes::Table)
                    .columns([
                        Likes::Id,
                        Likes::EntityType,
                        Likes::EntityId,
                        Likes::AuthorId,
                    ])
                    .values_panic([
                        uuid::Uuid::new_v4().to_string().into(),
                        entity_type.as_str().into(),
                        entity_id.clone().into(),
                        author_id.to_string().into(),
                    ])
                    .on_conflict(
                        OnConflict::columns([Likes::EntityType, Likes::EntityId, Likes::AuthorId])
                            .do_nothing()
                            .to_owned(),
                    )
                    .to_owned();
                let sql = <$db_type>::build_insert(insert);
                let inserted = sqlx::query(&sql).execute(&mut *tx).await?;
                if inserted.rows_affected() == 0 {
                    return Err(StorageError::AlreadyExists { entity: "like" });
                }

                let bump = Query::insert()
                    .into_table(LikesCount::Table)
                    .columns([LikesCount::EntityType, LikesCount::EntityId, LikesCount::Count])
                    .values_panic([entity_type.as_str().into(), entity_id.into(), 1i64.into()])
                    .on_conflict(
                        OnConflict::columns([LikesCount::EntityType, LikesCount::EntityId])
                            .value(
                                LikesCount::Count,
                                Expr::col((LikesCount::Table, LikesCount::Count)).add(1),
                            )
                            .to_owned(),
                    )
                    .to_owned();
                let sql = <$db_type>::build_insert(bump);
                sqlx::query(&sql).execute(&mut *tx).await?;

                tx.commit().await?;
                Ok(())
            }
        }
    };
}

impl_like_store!(super::postgres::Postgres, "postgres");
impl_like_store!(super::sqlite::Sqlite, "sqlite");
