// Request Repository Port (Interface)

use crate::domain::{NewRequest, StudentRequest};
use crate::error::Result;
use async_trait::async_trait;

/// CRUD accessor over one queue's backing table
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Backing table this accessor is bound to
    fn table_name(&self) -> &str;

    /// Delete every row; returns the number removed
    async fn reset(&self) -> Result<u64>;

    /// Insert a request; `Conflict` if the student id is already queued
    async fn add(&self, request: &NewRequest) -> Result<()>;

    /// Delete by student id; `NotFound` if absent
    async fn remove(&self, student_id: &str) -> Result<()>;

    /// All rows, oldest first
    async fn get_all(&self) -> Result<Vec<StudentRequest>>;

    async fn count(&self) -> Result<i64>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;

    /// In-memory queue table
    pub struct MockRequestRepository {
        table: String,
        rows: Mutex<Vec<StudentRequest>>,
        clock: AtomicI64,
    }

    impl MockRequestRepository {
        pub fn new(table: impl Into<String>) -> Self {
            Self {
                table: table.into(),
                rows: Mutex::new(Vec::new()),
                clock: AtomicI64::new(1),
            }
        }

        fn rows(&self) -> std::sync::MutexGuard<'_, Vec<StudentRequest>> {
            self.rows.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    #[async_trait]
    impl RequestRepository for MockRequestRepository {
        fn table_name(&self) -> &str {
            &self.table
        }

        async fn reset(&self) -> Result<u64> {
            let mut rows = self.rows();
            let removed = rows.len() as u64;
            rows.clear();
            Ok(removed)
        }

        async fn add(&self, request: &NewRequest) -> Result<()> {
            request.validate()?;
            let mut rows = self.rows();
            if rows.iter().any(|r| r.student_id == request.id) {
                return Err(AppError::Conflict(format!(
                    "Record with key {} already exists",
                    request.id
                )));
            }
            rows.push(StudentRequest {
                student_id: request.id.clone(),
                name: request.name.clone(),
                description: request.problem.clone(),
                timestamp: self.clock.fetch_add(1, Ordering::SeqCst),
            });
            Ok(())
        }

        async fn remove(&self, student_id: &str) -> Result<()> {
            let mut rows = self.rows();
            let before = rows.len();
            rows.retain(|r| r.student_id != student_id);
            if rows.len() == before {
                return Err(AppError::NotFound(format!(
                    "Record with key {} not found",
                    student_id
                )));
            }
            Ok(())
        }

        async fn get_all(&self) -> Result<Vec<StudentRequest>> {
            Ok(self.rows().clone())
        }

        async fn count(&self) -> Result<i64> {
            Ok(self.rows().len() as i64)
        }
    }
}
