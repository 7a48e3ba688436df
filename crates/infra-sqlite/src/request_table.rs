// SQLite RequestRepository Implementation (one accessor per queue table)

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use studentqueue_core::domain::{NewRequest, StudentRequest, TableName};
use studentqueue_core::error::{AppError, Result};
use studentqueue_core::port::{RequestRepository, TimeProvider};
use tracing::debug;

use crate::map_sqlx_error;

/// DDL for a queue's backing table
pub(crate) fn create_table_sql(table: &TableName) -> String {
    format!(
        r#"
        CREATE TABLE {} (
            studentid   TEXT NOT NULL PRIMARY KEY,
            name        TEXT NOT NULL,
            description TEXT NOT NULL,
            timestamp   INTEGER NOT NULL
        )
        "#,
        table.quoted()
    )
}

pub struct SqliteRequestTable {
    pool: SqlitePool,
    table: TableName,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteRequestTable {
    pub fn new(pool: SqlitePool, table: TableName, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            table,
            time_provider,
        }
    }
}

#[async_trait]
impl RequestRepository for SqliteRequestTable {
    fn table_name(&self) -> &str {
        self.table.as_str()
    }

    async fn reset(&self) -> Result<u64> {
        let sql = format!("DELETE FROM {}", self.table.quoted());
        let result = sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        debug!(table = %self.table, removed = result.rows_affected(), "Queue table reset");
        Ok(result.rows_affected())
    }

    async fn add(&self, request: &NewRequest) -> Result<()> {
        request.validate()?;

        // Single INSERT: the primary key rejects duplicates atomically
        let sql = format!(
            "INSERT INTO {} (studentid, name, description, timestamp) VALUES (?, ?, ?, ?)",
            self.table.quoted()
        );
        sqlx::query(&sql)
            .bind(&request.id)
            .bind(&request.name)
            .bind(&request.problem)
            .bind(self.time_provider.now_millis())
            .execute(&self.pool)
            .await
            .map_err(|e| match map_sqlx_error(e) {
                AppError::Conflict(_) => {
                    AppError::Conflict(format!("Record with key {} already exists", request.id))
                }
                other => other,
            })?;

        Ok(())
    }

    async fn remove(&self, student_id: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE studentid = ?", self.table.quoted());
        let result = sqlx::query(&sql)
            .bind(student_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Record with key {} not found",
                student_id
            )));
        }
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<StudentRequest>> {
        let sql = format!(
            "SELECT studentid, name, description, timestamp FROM {} ORDER BY timestamp ASC, rowid ASC",
            self.table.quoted()
        );
        let rows: Vec<RequestRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(RequestRow::into_request).collect())
    }

    async fn count(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table.quoted());
        sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct RequestRow {
    studentid: String,
    name: String,
    description: String,
    timestamp: i64,
}

impl RequestRow {
    fn into_request(self) -> StudentRequest {
        StudentRequest {
            student_id: self.studentid,
            name: self.name,
            description: self.description,
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_pool;
    use studentqueue_core::port::time_provider::SteppingTimeProvider;

    async fn setup_table(name: &str) -> SqliteRequestTable {
        let pool = create_pool("sqlite::memory:", 2).await.unwrap();
        let table = TableName::parse(name).unwrap();
        sqlx::query(&create_table_sql(&table))
            .execute(&pool)
            .await
            .unwrap();
        SqliteRequestTable::new(pool, table, Arc::new(SteppingTimeProvider::new(1000, 1)))
    }

    #[tokio::test]
    async fn test_add_and_get_all() {
        let repo = setup_table("default_queue").await;

        repo.add(&NewRequest::new("111111", "Michael", "Just testing"))
            .await
            .unwrap();

        let rows = repo.get_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student_id, "111111");
        assert_eq!(rows[0].name, "Michael");
        assert_eq!(rows[0].description, "Just testing");
        assert_eq!(rows[0].timestamp, 1000);
    }

    #[tokio::test]
    async fn test_duplicate_key_conflicts() {
        let repo = setup_table("dup").await;
        repo.add(&NewRequest::new("111111", "X", "Y")).await.unwrap();

        let err = repo
            .add(&NewRequest::new("111111", "Other", "Again"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg.contains("111111")));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_request_rejected() {
        let repo = setup_table("invalid").await;
        let err = repo.add(&NewRequest::new("", "X", "Y")).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_remove() {
        let repo = setup_table("remove_me").await;
        repo.add(&NewRequest::new("111111", "X", "Y")).await.unwrap();
        repo.add(&NewRequest::new("222222", "Z", "W")).await.unwrap();

        repo.remove("111111").await.unwrap();

        let rows = repo.get_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].student_id, "222222");

        let err = repo.remove("111111").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_all_oldest_first() {
        let repo = setup_table("ordering").await;
        for id in ["3", "1", "2"] {
            repo.add(&NewRequest::new(id, "S", "P")).await.unwrap();
        }

        let ids: Vec<String> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.student_id)
            .collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[tokio::test]
    async fn test_reset() {
        let repo = setup_table("reset_me").await;
        repo.add(&NewRequest::new("1", "S", "P")).await.unwrap();
        repo.add(&NewRequest::new("2", "S", "P")).await.unwrap();

        assert_eq!(repo.reset().await.unwrap(), 2);
        assert!(repo.get_all().await.unwrap().is_empty());
        assert_eq!(repo.reset().await.unwrap(), 0);
    }
}
