//! PostgreSQL implementation of tag repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::domain::entities::{AccessScope, Tag, TagStats};
use crate::domain::repositories::{TagRepository, TagsListFilter};
use crate::error::AppError;
use crate::infrastructure::persistence::tag_queries;

#[derive(Debug, FromRow)]
struct TagRow {
    id: i64,
    name: String,
}

#[derive(Debug, FromRow)]
struct TagStatsRow {
    name: String,
    short_urls_count: i64,
    visits_count: i64,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag::new(row.id, row.name)
    }
}

impl From<TagStatsRow> for TagStats {
    fn from(row: TagStatsRow) -> Self {
        TagStats::new(row.name, row.short_urls_count, row.visits_count)
    }
}

/// PostgreSQL repository for tags and their statistics.
///
/// All dynamic SQL is produced by [`tag_queries`] with bound parameters.
pub struct PgTagRepository {
    pool: Arc<PgPool>,
}

impl PgTagRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Opens a read-only transaction whose queries all see one snapshot.
    async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Runs the selection phase and then aggregates exactly the selected tags.
async fn aggregate_tags(
    conn: &mut PgConnection,
    filter: &TagsListFilter,
) -> Result<Vec<TagStats>, AppError> {
    let mut selection = tag_queries::selection_query(filter);
    let selected: Vec<TagRow> = selection.build_query_as().fetch_all(&mut *conn).await?;

    if selected.is_empty() {
        return Ok(Vec::new());
    }

    let tag_ids: Vec<i64> = selected.iter().map(|row| row.id).collect();
    tracing::debug!(tags = tag_ids.len(), scope = %filter.scope, "aggregating tag stats");

    let mut aggregation = tag_queries::aggregation_query(tag_ids, filter);
    let rows: Vec<TagStatsRow> = aggregation.build_query_as().fetch_all(&mut *conn).await?;

    Ok(rows.into_iter().map(TagStats::from).collect())
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn find_tags_with_info(&self, filter: TagsListFilter) -> Result<Vec<TagStats>, AppError> {
        let mut tx = self.begin_snapshot().await?;
        let stats = aggregate_tags(&mut *tx, &filter).await?;
        tx.commit().await?;

        Ok(stats)
    }

    async fn find_tags_with_info_and_total(
        &self,
        filter: TagsListFilter,
    ) -> Result<(Vec<TagStats>, i64), AppError> {
        let mut tx = self.begin_snapshot().await?;

        let stats = aggregate_tags(&mut *tx, &filter).await?;

        let mut count = tag_queries::count_query(&filter);
        let total: i64 = count.build_query_scalar().fetch_one(&mut *tx).await?;

        tx.commit().await?;

        Ok((stats, total))
    }

    async fn find_tags(&self, filter: TagsListFilter) -> Result<Vec<Tag>, AppError> {
        let mut selection = tag_queries::selection_query(&filter);
        let rows: Vec<TagRow> = selection
            .build_query_as()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn count_tags(&self, filter: TagsListFilter) -> Result<i64, AppError> {
        let mut query = tag_queries::count_query(&filter);
        let count: i64 = query
            .build_query_scalar()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn tag_exists(&self, name: &str, scope: AccessScope) -> Result<bool, AppError> {
        let mut query = tag_queries::exists_query(name, scope);
        let count: i64 = query
            .build_query_scalar()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count > 0)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, AppError> {
        let row: Option<TagRow> = sqlx::query_as("SELECT id, name FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Tag::from))
    }

    async fn delete_by_name(&self, names: &[String]) -> Result<u64, AppError> {
        if names.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM tags WHERE name = ANY($1)")
            .bind(names)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn rename(&self, old_name: &str, new_name: &str) -> Result<Tag, AppError> {
        let row: Option<TagRow> =
            sqlx::query_as("UPDATE tags SET name = $2 WHERE name = $1 RETURNING id, name")
                .bind(old_name)
                .bind(new_name)
                .fetch_optional(self.pool.as_ref())
                .await?;

        row.map(Tag::from)
            .ok_or_else(|| AppError::not_found("Tag not found", json!({ "tag": old_name })))
    }
}
