//! Unified SQL CountStore implementation.

use std::marker::PhantomData;

use sea_query::{Expr, Query, SelectStatement};
use uuid::Uuid;

use super::SqlDatabase;
use crate::model::{CountKind, EntityType};
use crate::storage::schema::{CommentsCount, LikesCount};

/// SQL-based implementation of CountStore.
pub struct SqlCountStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlCountStore<DB> {
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

/// `SELECT key, count` for the counter table behind `kind`, restricted to `ids`.
fn counts_query(kind: CountKind, ids: &[Uuid]) -> SelectStatement {
    let ids = ids.iter().map(|id| id.to_string());
    match kind {
        CountKind::PostLikes | CountKind::CommentLikes => {
            let entity_type = match kind {
                CountKind::CommentLikes => EntityType::Comment,
                _ => EntityType::Post,
            };
            Query::select()
                .columns([LikesCount::EntityId, LikesCount::Count])
                .from(LikesCount::Table)
                .and_where(Expr::col(LikesCount::EntityType).eq(entity_type.as_str()))
                .and_where(Expr::col(LikesCount::EntityId).is_in(ids))
                .to_owned()
        }
        CountKind::PostComments => Query::select()
            .columns([CommentsCount::PostId, CommentsCount::Count])
            .from(CommentsCount::Table)
            .and_where(Expr::col(CommentsCount::PostId).is_in(ids))
            .to_owned(),
    }
}

macro_rules! impl_count_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::storage::CountStore for SqlCountStore<$db_type> {
            async fn get_count(
                &self,
                kind: CountKind,
                entity_id: Uuid,
            ) -> crate::storage::Result<u64> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(counts_query(kind, &[entity_id]));
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;

                match row {
                    Some(row) => Ok(super::rows::parse_count(row.try_get(1)?)),
                    None => Ok(0),
                }
            }

            async fn get_counts(
                &self,
                kind: CountKind,
                entity_ids: &[Uuid],
            ) -> crate::storage::Result<std::collections::HashMap<Uuid, u64>> {
                use sqlx::Row;

                let mut counts: std::collections::HashMap<Uuid, u64> =
                    entity_ids.iter().map(|&id| (id, 0)).collect();
                if entity_ids.is_empty() {
                    return Ok(counts);
                }

                let sql = <$db_type>::build_select(counts_query(kind, entity_ids));
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                for row in rows {
                    let id: String = row.try_get(0)?;
                    let count: i64 = row.try_get(1)?;
                    counts.insert(super::rows::parse_id(&id)?, super::rows::parse_count(count));
                }
                Ok(counts)
            }
        }
    };
}

impl_count_store!(super::postgres::Postgres, "postgres");
impl_count_store!(super::sqlite::Sqlite, "sqlite");
