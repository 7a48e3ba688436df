// Queue Store Port (Interface)

use crate::domain::{QueueRecord, TableName};
use crate::error::Result;
use crate::port::RequestRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Persistence of the queue metadata table
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Create the metadata table if missing and seed the admin credential.
    ///
    /// Idempotent: an existing admin row keeps its hash.
    async fn create_config_table(&self, admin_hash: &str) -> Result<()>;

    /// Find queue by name (case-insensitive); includes the admin row
    async fn find_by_name(&self, name: &str) -> Result<Option<QueueRecord>>;

    /// All non-reserved queues, ordered by name
    async fn list_queues(&self) -> Result<Vec<QueueRecord>>;

    /// Returns false if no queue matched
    async fn update_hash(&self, name: &str, hash: &str) -> Result<bool>;

    /// Returns false if no queue matched
    async fn update_description(&self, name: &str, description: Option<&str>) -> Result<bool>;

    /// Build a CRUD accessor bound to `table`
    fn open_request_table(&self, table: &TableName) -> Arc<dyn RequestRepository>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use crate::port::request_repository::mocks::MockRequestRepository;
    use crate::port::transaction::{QueueStoreTransaction, Transaction, TransactionalQueueStore};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockState {
        queues: Vec<QueueRecord>,
        // keyed by lowercase table name
        tables: HashMap<String, Arc<MockRequestRepository>>,
    }

    impl MockState {
        fn find(&self, name: &str) -> Option<&QueueRecord> {
            self.queues
                .iter()
                .find(|q| q.name.eq_ignore_ascii_case(name))
        }

        fn find_mut(&mut self, name: &str) -> Option<&mut QueueRecord> {
            self.queues
                .iter_mut()
                .find(|q| q.name.eq_ignore_ascii_case(name))
        }
    }

    /// In-memory QueueStore; transactions work on a snapshot that replaces
    /// the shared state on commit
    #[derive(Default)]
    pub struct MockQueueStore {
        state: Arc<Mutex<MockState>>,
        fail_next_insert: Arc<AtomicBool>,
        fail_next_list: AtomicBool,
    }

    impl MockQueueStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make the next `insert_queue` fail with a database error
        pub fn fail_next_insert(&self) {
            self.fail_next_insert.store(true, Ordering::SeqCst);
        }

        /// Make the next `list_queues` fail with a database error
        pub fn fail_next_list(&self) {
            self.fail_next_list.store(true, Ordering::SeqCst);
        }

        pub fn table_count(&self) -> usize {
            self.lock().tables.len()
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
            self.state.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    #[async_trait]
    impl QueueStore for MockQueueStore {
        async fn create_config_table(&self, admin_hash: &str) -> Result<()> {
            let mut state = self.lock();
            if state.find(crate::domain::ADMIN_QUEUE).is_none() {
                state.queues.push(QueueRecord::admin(admin_hash));
            }
            Ok(())
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<QueueRecord>> {
            Ok(self.lock().find(name).cloned())
        }

        async fn list_queues(&self) -> Result<Vec<QueueRecord>> {
            if self.fail_next_list.swap(false, Ordering::SeqCst) {
                return Err(AppError::Database("injected list failure".to_string()));
            }
            let mut queues: Vec<QueueRecord> = self
                .lock()
                .queues
                .iter()
                .filter(|q| !q.is_reserved())
                .cloned()
                .collect();
            queues.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(queues)
        }

        async fn update_hash(&self, name: &str, hash: &str) -> Result<bool> {
            Ok(self
                .lock()
                .find_mut(name)
                .map(|q| q.hash = hash.to_string())
                .is_some())
        }

        async fn update_description(&self, name: &str, description: Option<&str>) -> Result<bool> {
            Ok(self
                .lock()
                .find_mut(name)
                .map(|q| q.description = description.map(str::to_string))
                .is_some())
        }

        fn open_request_table(&self, table: &TableName) -> Arc<dyn RequestRepository> {
            let key = table.as_str().to_ascii_lowercase();
            let existing = self.lock().tables.get(&key).cloned();
            match existing {
                Some(repo) => repo,
                None => Arc::new(MockRequestRepository::new(table.as_str())),
            }
        }
    }

    #[async_trait]
    impl TransactionalQueueStore for MockQueueStore {
        async fn begin_transaction(&self) -> Result<Box<dyn QueueStoreTransaction>> {
            Ok(Box::new(MockTransaction {
                staged: self.lock().clone(),
                target: Arc::clone(&self.state),
                fail_next_insert: Arc::clone(&self.fail_next_insert),
            }))
        }
    }

    pub struct MockTransaction {
        staged: MockState,
        target: Arc<Mutex<MockState>>,
        fail_next_insert: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Transaction for MockTransaction {
        async fn commit(self: Box<Self>) -> Result<()> {
            *self.target.lock().unwrap_or_else(|e| e.into_inner()) = self.staged;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl QueueStoreTransaction for MockTransaction {
        async fn find_by_name(&mut self, name: &str) -> Result<Option<QueueRecord>> {
            Ok(self.staged.find(name).cloned())
        }

        async fn table_exists(&mut self, table: &TableName) -> Result<bool> {
            let key = table.as_str().to_ascii_lowercase();
            Ok(key == crate::domain::METADATA_TABLE || self.staged.tables.contains_key(&key))
        }

        async fn create_request_table(&mut self, table: &TableName) -> Result<()> {
            let key = table.as_str().to_ascii_lowercase();
            if self.staged.tables.contains_key(&key) {
                return Err(AppError::Database(format!("table {} already exists", table)));
            }
            self.staged
                .tables
                .insert(key, Arc::new(MockRequestRepository::new(table.as_str())));
            Ok(())
        }

        async fn drop_request_table(&mut self, table: &TableName) -> Result<()> {
            let key = table.as_str().to_ascii_lowercase();
            match self.staged.tables.remove(&key) {
                Some(_) => Ok(()),
                None => Err(AppError::Database(format!("no such table: {}", table))),
            }
        }

        async fn insert_queue(&mut self, record: &QueueRecord) -> Result<()> {
            if self.fail_next_insert.swap(false, Ordering::SeqCst) {
                return Err(AppError::Database("injected insert failure".to_string()));
            }
            if self.staged.find(&record.name).is_some() {
                return Err(AppError::Conflict(format!(
                    "Queue with name {} already exists",
                    record.name
                )));
            }
            self.staged.queues.push(record.clone());
            Ok(())
        }

        async fn rename_queue(&mut self, old_name: &str, new_name: &str) -> Result<bool> {
            Ok(self
                .staged
                .find_mut(old_name)
                .map(|q| q.name = new_name.to_string())
                .is_some())
        }

        async fn delete_queue(&mut self, name: &str) -> Result<bool> {
            let before = self.staged.queues.len();
            self.staged
                .queues
                .retain(|q| !q.name.eq_ignore_ascii_case(name));
            Ok(self.staged.queues.len() != before)
        }
    }
}
