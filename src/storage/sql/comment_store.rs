//! Unified SQL CommentStore implementation.

use std::marker::PhantomData;

use super::SqlDatabase;

/// SQL-based implementation of CommentStore.
///
/// Comment inserts and comment-counter increments share one transaction.
pub struct SqlCommentStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlCommentStore<DB> {
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

macro_rules! impl_comment_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::storage::CommentStore for SqlCommentStore<$db_type> {
            async fn create(&self, comment: &crate::model::Comment) -> crate::storage::Result<()> {
                use sea_query::{Expr, OnConflict, Query};

                use crate::storage::schema::{Comments, CommentsCount, Posts};
                use crate::storage::StorageError;

                let post_id = comment.post_id.to_string();
                let mut tx = self.pool.begin().await?;

                let probe = Query::select()
                    .column(Posts::Id)
                    .from(Posts::Table)
                    .and_where(Expr::col(Posts::Id).eq(post_id.clone()))
                    .limit(1)
                    .to_owned();
                let sql = <$db_type>::build_select(probe);
                if sqlx::query(&sql).fetch_optional(&mut *tx).await?.is_none() {
                    return Err(StorageError::NotFound {
                        entity: "post",
                        id: comment.post_id,
                    });
                }

                let insert = Query::insert()
                    .into_table(Comments::Table)
                    .columns([
                        Comments::Id,
                        Comments::PostId,
                        Comments::AuthorId,
                        Comments::Body,
                        Comments::CreatedAt,
                    ])
                    .values_panic([
                        comment.id.to_string().into(),
                        post_id.clone().into(),
                        comment.author_id.to_string().into(),
                        comment.body.clone().into(),
                        comment.created_at.timestamp_micros().into(),
                    ])
                    .to_owned();
                let sql = <$db_type>::build_insert(insert);
                sqlx::query(&sql)
                    .execute(&mut *tx)
                    .await
                    .map_err(super::rows::on_unique("comment"))?;

                let bump = Query::insert()
                    .into_table(CommentsCount::Table)
                    .columns([CommentsCount::PostId, CommentsCount::Count])
                    .values_panic([post_id.into(), 1i64.into()])
                    .on_conflict(
                        OnConflict::column(CommentsCount::PostId)
                            .value(
                                CommentsCount::Count,
                                Expr::col((CommentsCount::Table, CommentsCount::Count)).add(1),
                            )
                            .to_owned(),
                    )
                    .to_owned();
                let sql = <$db_type>::build_insert(bump);
                sqlx::query(&sql).execute(&mut *tx).await?;

                tx.commit().await?;
                Ok(())
            }

            async fn exists(&self, id: uuid::Uuid) -> crate::storage::Result<bool> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::Comments;

                let stmt = Query::select()
                    .column(Comments::Id)
                    .from(Comments::Table)
                    .and_where(Expr::col(Comments::Id).eq(id.to_string()))
                    .limit(1)
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;

                Ok(row.is_some())
            }

            async fn page_by_post(
                &self,
                post_id: uuid::Uuid,
                after: Option<&crate::pagination::Cursor>,
                fetch_limit: usize,
            ) -> crate::storage::Result<Vec<crate::model::Comment>> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::Comments;

                let sql = {
                    let mut stmt = Query::select()
                        .columns([
                            Comments::Id,
                            Comments::PostId,
                            Comments::AuthorId,
                            Comments::Body,
                            Comments::CreatedAt,
                        ])
                        .from(Comments::Table)
                        .and_where(Expr::col(Comments::PostId).eq(post_id.to_string()))
                        .to_owned();
                    super::keyset::apply(
                        &mut stmt,
                        Comments::CreatedAt,
                        Comments::Id,
                        after,
                        fetch_limit,
                    );
                    <$db_type>::build_select(stmt)
                };
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.iter().map(super::rows::decode_comment).collect()
            }
        }
    };
}

impl_comment_store!(super::postgres::Postgres, "postgres");
impl_comment_store!(super::sqlite::Sqlite, "sqlite");
