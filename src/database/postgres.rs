use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use super::TaskStore;
use crate::config::StorageConfig;
use crate::error::{Result, TaskboardError};
use crate::models::Task;
use crate::query_builder::builder::{is_valid_table_name, GROUP_KEY_COLUMN};
use crate::query_builder::{
    AggregationPipeline, GroupResult, PageWindow, Predicate, QueryBuilder, SortSpec,
};

/// PostgreSQL task collection: one JSONB document per row.
///
/// `created_at`/`updated_at` are mirrored into columns for operators; reads
/// always go through the document.
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
    table: String,
}

impl PgTaskStore {
    /// Connect using the storage section of the configuration and make sure
    /// the table exists
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let database_url = config.database_url.as_deref().ok_or_else(|| {
            TaskboardError::Configuration(
                "storage.database_url is required for the postgres backend".to_string(),
            )
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(database_url)
            .await?;

        let store = Self::from_pool(pool, &config.table)?;
        store.ensure_schema().await?;
        info!(table = %store.table, "Connected to PostgreSQL task store");
        Ok(store)
    }

    pub fn from_pool(pool: PgPool, table: &str) -> Result<Self> {
        if !is_valid_table_name(table) {
            return Err(TaskboardError::Configuration(format!(
                "Invalid table name: {table}"
            )));
        }
        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\
             id UUID PRIMARY KEY, \
             document JSONB NOT NULL, \
             created_at TIMESTAMPTZ NOT NULL, \
             updated_at TIMESTAMPTZ NOT NULL)",
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    fn group_from_row(row: &PgRow, pipeline: &AggregationPipeline) -> Result<GroupResult> {
        let key: Option<String> = row.try_get(GROUP_KEY_COLUMN)?;
        let values = pipeline
            .accumulators
            .iter()
            .map(|(name, _)| -> Result<(String, f64)> {
                let value: Option<f64> = row.try_get(name.as_str())?;
                Ok((name.clone(), value.unwrap_or(0.0)))
            })
            .collect::<Result<_>>()?;
        Ok(GroupResult { key, values })
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, task: Task) -> Result<Task> {
        let sql = format!(
            "INSERT INTO {} (id, document, created_at, updated_at) VALUES ($1, $2, $3, $4)",
            self.table
        );
        sqlx::query(&sql)
            .bind(task.id)
            .bind(Json(&task))
            .bind(task.created_at)
            .bind(task.updated_at)
            .execute(&self.pool)
            .await?;
        Ok(task)
    }

    async fn insert_many(&self, tasks: Vec<Task>) -> Result<Vec<Task>> {
        let sql = format!(
            "INSERT INTO {} (id, document, created_at, updated_at) VALUES ($1, $2, $3, $4)",
            self.table
        );
        let mut tx = self.pool.begin().await?;
        for task in &tasks {
            sqlx::query(&sql)
                .bind(task.id)
                .bind(Json(task))
                .bind(task.created_at)
                .bind(task.updated_at)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(tasks)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Task>> {
        let sql = format!("SELECT document FROM {} WHERE id = $1", self.table);
        let document: Option<Json<Task>> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(document.map(|Json(task)| task))
    }

    async fn replace(&self, task: Task) -> Result<Task> {
        let sql = format!(
            "UPDATE {} SET document = $2, updated_at = $3 WHERE id = $1",
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(task.id)
            .bind(Json(&task))
            .bind(task.updated_at)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TaskboardError::task_not_found(task.id));
        }
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Task>> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING document", self.table);
        let document: Option<Json<Task>> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(document.map(|Json(task)| task))
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64> {
        let sql = format!("DELETE FROM {} WHERE id = ANY($1)", self.table);
        let result = sqlx::query(&sql).bind(ids).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn find(
        &self,
        predicate: &Predicate,
        sort: SortSpec,
        window: Option<PageWindow>,
    ) -> Result<Vec<Task>> {
        let mut query = QueryBuilder::new(&self.table)
            .select(&["document"])
            .where_predicate(predicate)
            .order_by_spec(sort);
        if let Some(window) = window {
            query = query.window(window);
        }
        debug!(sql = %query.build_sql(), "find");

        let rows: Vec<(Json<Task>,)> = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(Json(task),)| task).collect())
    }

    async fn count(&self, predicate: &Predicate) -> Result<u64> {
        let count = QueryBuilder::new(&self.table)
            .where_predicate(predicate)
            .count(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn aggregate(&self, pipeline: &AggregationPipeline) -> Result<Vec<GroupResult>> {
        let sql = QueryBuilder::aggregate(&self.table, pipeline).build_sql();
        debug!(sql = %sql, "aggregate");

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| Self::group_from_row(row, pipeline))
            .collect()
    }

    async fn health_check(&self) -> Result<()> {
        let row = sqlx::query("SELECT 1 as health")
            .fetch_one(&self.pool)
            .await?;
        let health: i32 = row.try_get("health")?;
        if health == 1 {
            Ok(())
        } else {
            Err(TaskboardError::Storage(
                "Unexpected health check result".to_string(),
            ))
        }
    }
}
