//! Unified SQL FollowGraph implementation.

use std::marker::PhantomData;

use super::SqlDatabase;

/// SQL-based implementation of FollowGraph.
pub struct SqlFollowGraph<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlFollowGraph<DB> {
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

macro_rules! impl_follow_graph {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::storage::FollowGraph for SqlFollowGraph<$db_type> {
            async fn follow(
                &self,
                follower: uuid::Uuid,
                followed: uuid::Uuid,
            ) -> crate::storage::Result<()> {
                use sea_query::{OnConflict, Query};

                use crate::storage::schema::Follows;
                use crate::storage::StorageError;

                if follower == followed {
                    return Err(StorageError::Constraint(
                        "a user cannot follow themselves".to_string(),
                    ));
                }

                let stmt = Query::insert()
                    .into_table(Follows::Table)
                    .columns([Follows::FollowerId, Follows::FollowedId, Follows::CreatedAt])
                    .values_panic([
                        follower.to_string().into(),
                        followed.to_string().into(),
                        crate::model::now_micros().timestamp_micros().into(),
                    ])
                    .on_conflict(
                        OnConflict::columns([Follows::FollowerId, Follows::FollowedId])
                            .do_nothing()
                            .to_owned(),
                    )
                    .to_owned();

                let sql = <$db_type>::build_insert(stmt);
                let inserted = sqlx::query(&sql).execute(&self.pool).await?;
                if inserted.rows_affected() == 0 {
                    return Err(StorageError::AlreadyExists { entity: "follow" });
                }
                Ok(())
            }

            async fn followed(&self, user: uuid::Uuid) -> crate::storage::Result<Vec<uuid::Uuid>> {
                use sea_query::{Expr, Query};
                use sqlx::Row;

                use crate::storage::schema::Follows;

                let stmt = Query::select()
                    .column(Follows::FollowedId)
                    .from(Follows::Table)
                    .and_where(Expr::col(Follows::FollowerId).eq(user.to_string()))
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.iter()
                    .map(|row| {
                        let id: String = row.try_get("followed_id")?;
                        super::rows::parse_id(&id)
                    })
                    .collect()
            }
        }
    };
}

impl_follow_graph!(super::postgres::Postgres, "postgres");
impl_follow_graph!(super::sqlite::Sqlite, "sqlite");
