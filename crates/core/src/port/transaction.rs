// Transaction port for atomic check-then-act sequences

use crate::domain::{QueueRecord, TableName};
use crate::error::Result;
use crate::port::QueueStore;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// QueueStore that can open transactions
#[async_trait]
pub trait TransactionalQueueStore: QueueStore {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn QueueStoreTransaction>>;
}

/// Metadata and DDL operations within a transaction
///
/// Dropping the transaction without committing rolls it back.
#[async_trait]
pub trait QueueStoreTransaction: Transaction {
    /// Find queue by name (case-insensitive)
    async fn find_by_name(&mut self, name: &str) -> Result<Option<QueueRecord>>;

    /// True if any table with this name exists (case-insensitive)
    async fn table_exists(&mut self, table: &TableName) -> Result<bool>;

    async fn create_request_table(&mut self, table: &TableName) -> Result<()>;

    async fn drop_request_table(&mut self, table: &TableName) -> Result<()>;

    async fn insert_queue(&mut self, record: &QueueRecord) -> Result<()>;

    /// Returns false if `old_name` matched no row
    async fn rename_queue(&mut self, old_name: &str, new_name: &str) -> Result<bool>;

    /// Returns false if `name` matched no row
    async fn delete_queue(&mut self, name: &str) -> Result<bool>;
}
