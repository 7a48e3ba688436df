// SQLite QueueStore Implementation

use crate::{map_sqlx_error, run_migrations, seed_admin, SqliteQueueTransaction, SqliteRequestTable};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use studentqueue_core::domain::{QueueRecord, TableName, ADMIN_QUEUE};
use studentqueue_core::error::Result;
use studentqueue_core::port::{
    QueueStore, QueueStoreTransaction, RequestRepository, TimeProvider, TransactionalQueueStore,
};

pub struct SqliteQueueStore {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteQueueStore {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl QueueStore for SqliteQueueStore {
    async fn create_config_table(&self, admin_hash: &str) -> Result<()> {
        run_migrations(&self.pool).await?;
        seed_admin(&self.pool, admin_hash).await?;
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<QueueRecord>> {
        let row = sqlx::query_as::<_, QueueRow>(
            "SELECT name, table_name, hash, description FROM queues WHERE name = ? LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(QueueRow::into_record))
    }

    async fn list_queues(&self) -> Result<Vec<QueueRecord>> {
        let rows: Vec<QueueRow> = sqlx::query_as(
            r#"
            SELECT name, table_name, hash, description FROM queues
            WHERE name <> ?
            ORDER BY name ASC
            "#,
        )
        .bind(ADMIN_QUEUE)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(QueueRow::into_record).collect())
    }

    async fn update_hash(&self, name: &str, hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE queues SET hash = ? WHERE name = ?")
            .bind(hash)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_description(&self, name: &str, description: Option<&str>) -> Result<bool> {
        let result = sqlx::query("UPDATE queues SET description = ? WHERE name = ?")
            .bind(description)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    fn open_request_table(&self, table: &TableName) -> Arc<dyn RequestRepository> {
        Arc::new(SqliteRequestTable::new(
            self.pool.clone(),
            table.clone(),
            Arc::clone(&self.time_provider),
        ))
    }
}

#[async_trait]
impl TransactionalQueueStore for SqliteQueueStore {
    async fn begin_transaction(&self) -> Result<Box<dyn QueueStoreTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteQueueTransaction::new(tx)))
    }
}

/// SQLite row representation of the metadata table
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct QueueRow {
    name: String,
    table_name: String,
    hash: String,
    description: Option<String>,
}

impl QueueRow {
    pub(crate) fn into_record(self) -> QueueRecord {
        QueueRecord {
            name: self.name,
            table_name: self.table_name,
            hash: self.hash,
            description: self.description,
        }
    }
}
