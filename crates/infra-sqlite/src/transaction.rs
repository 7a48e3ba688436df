// SQLite Transaction Implementation

use crate::map_sqlx_error;
use crate::queue_store::QueueRow;
use crate::request_table::create_table_sql;
use async_trait::async_trait;
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use studentqueue_core::domain::{QueueRecord, TableName};
use studentqueue_core::error::Result;
use studentqueue_core::port::{QueueStoreTransaction, Transaction};
use tracing::debug;

/// Metadata + DDL transaction; SQLite DDL is transactional, so a rollback
/// also undoes CREATE / DROP TABLE
pub struct SqliteQueueTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteQueueTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteQueueTransaction<'_> {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl QueueStoreTransaction for SqliteQueueTransaction<'_> {
    async fn find_by_name(&mut self, name: &str) -> Result<Option<QueueRecord>> {
        let row = sqlx::query_as::<_, QueueRow>(
            "SELECT name, table_name, hash, description FROM queues WHERE name = ? LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(QueueRow::into_record))
    }

    async fn table_exists(&mut self, table: &TableName) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ? COLLATE NOCASE",
        )
        .bind(table.as_str())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count > 0)
    }

    async fn create_request_table(&mut self, table: &TableName) -> Result<()> {
        sqlx::query(&create_table_sql(table))
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        debug!(table = %table, "Queue table created");
        Ok(())
    }

    async fn drop_request_table(&mut self, table: &TableName) -> Result<()> {
        let sql = format!("DROP TABLE {}", table.quoted());
        sqlx::query(&sql)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        debug!(table = %table, "Queue table dropped");
        Ok(())
    }

    async fn insert_queue(&mut self, record: &QueueRecord) -> Result<()> {
        sqlx::query("INSERT INTO queues (name, table_name, hash, description) VALUES (?, ?, ?, ?)")
            .bind(&record.name)
            .bind(&record.table_name)
            .bind(&record.hash)
            .bind(&record.description)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn rename_queue(&mut self, old_name: &str, new_name: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE queues SET name = ? WHERE name = ?")
            .bind(new_name)
            .bind(old_name)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_queue(&mut self, name: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM queues WHERE name = ?")
            .bind(name)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
