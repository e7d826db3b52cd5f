//! Unified SQL PostStore implementation.

use std::marker::PhantomData;

use super::SqlDatabase;

/// SQL-based implementation of PostStore.
pub struct SqlPostStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlPostStore<DB> {
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

/// Select the columns of [`super::rows::PostRow`].
fn select_posts() -> sea_query::SelectStatement {
    use crate::storage::schema::Posts;

    sea_query::Query::select()
        .columns([
            Posts::Id,
            Posts::AuthorId,
            Posts::Body,
            Posts::Images,
            Posts::CreatedAt,
        ])
        .from(Posts::Table)
        .to_owned()
}

macro_rules! impl_post_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::storage::PostStore for SqlPostStore<$db_type> {
            async fn create(&self, post: &crate::model::Post) -> crate::storage::Result<()> {
                use sea_query::Query;

                use crate::storage::schema::Posts;

                let images = serde_json::to_string(&post.images)?;

                let stmt = Query::insert()
                    .into_table(Posts::Table)
                    .columns([
                        Posts::Id,
                        Posts::AuthorId,
                        Posts::Body,
                        Posts::Images,
                        Posts::CreatedAt,
                    ])
                    .values_panic([
                        post.id.to_string().into(),
                        post.author_id.to_string().into(),
                        post.body.clone().into(),
                        images.into(),
                        post.created_at.timestamp_micros().into(),
                    ])
                    .to_owned();

                let sql = <$db_type>::build_insert(stmt);
                sqlx::query(&sql)
                    .execute(&self.pool)
                    .await
                    .map_err(super::rows::on_unique("post"))?;

                Ok(())
            }

            async fn get(
                &self,
                id: uuid::Uuid,
            ) -> crate::storage::Result<Option<crate::model::Post>> {
                use sea_query::Expr;

                use crate::storage::schema::Posts;

                let stmt = select_posts()
                    .and_where(Expr::col(Posts::Id).eq(id.to_string()))
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;

                row.as_ref().map(super::rows::decode_post).transpose()
            }

            async fn exists(&self, id: uuid::Uuid) -> crate::storage::Result<bool> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::Posts;

                let stmt = Query::select()
                    .column(Posts::Id)
                    .from(Posts::Table)
                    .and_where(Expr::col(Posts::Id).eq(id.to_string()))
                    .limit(1)
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;

                Ok(row.is_some())
            }

            async fn page_by_authors(
                &self,
                authors: &[uuid::Uuid],
                after: Option<&crate::pagination::Cursor>,
                fetch_limit: usize,
            ) -> crate::storage::Result<Vec<crate::model::Post>> {
                use sea_query::Expr;

                use crate::storage::schema::Posts;

                if authors.is_empty() {
                    return Ok(Vec::new());
                }

                // SelectStatement is not Send; render it before awaiting.
                let sql = {
                    let mut stmt = select_posts()
                        .and_where(
                            Expr::col(Posts::AuthorId)
                                .is_in(authors.iter().map(|a| a.to_string())),
                        )
                        .to_owned();
                    super::keyset::apply(
                        &mut stmt,
                        Posts::CreatedAt,
                        Posts::Id,
                        after,
                        fetch_limit,
                    );
                    <$db_type>::build_select(stmt)
                };
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.iter().map(super::rows::decode_post).collect()
            }
        }
    };
}

impl_post_store!(super::postgres::Postgres, "postgres");
impl_post_store!(super::sqlite::Sqlite, "sqlite");
