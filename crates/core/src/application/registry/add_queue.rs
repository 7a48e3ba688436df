// Add Queue Use Case

use crate::domain::{NewQueue, QueueInfo, QueueRecord};
use crate::error::{AppError, Result};
use crate::port::{PasswordHasher, TransactionalQueueStore};

/// Execute add-queue use case (one transaction: checks, DDL and metadata insert)
///
/// # Arguments
///
/// * `store` - Transactional queue store
/// * `hasher` - Password digest for the new credential
/// * `req` - Queue to create (plaintext password)
pub async fn execute(
    store: &dyn TransactionalQueueStore,
    hasher: &dyn PasswordHasher,
    req: NewQueue,
) -> Result<QueueInfo> {
    // Validation happens before any query
    let (name, table) = req.validate()?;

    let mut tx = store.begin_transaction().await?;

    if tx.find_by_name(name.as_str()).await?.is_some() {
        tx.rollback().await?;
        return Err(AppError::Conflict(format!(
            "Queue with name {} already exists",
            name
        )));
    }

    if tx.table_exists(&table).await? {
        tx.rollback().await?;
        return Err(AppError::Conflict(format!(
            "Table {} already exists",
            table
        )));
    }

    // DDL and insert commit together; an error drops (rolls back) the transaction
    tx.create_request_table(&table).await?;

    let record = QueueRecord {
        name: name.into_inner(),
        table_name: table.as_str().to_string(),
        hash: hasher.hash(&req.password),
        description: req.description,
    };
    tx.insert_queue(&record).await?;

    tx.commit().await?;

    Ok(record.into())
}
