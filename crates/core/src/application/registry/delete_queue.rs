// Delete Queue Use Case

use crate::domain::{DomainError, QueueRecord, TableName};
use crate::error::{AppError, Result};
use crate::port::TransactionalQueueStore;

/// Drop the backing table, then delete the metadata row (one transaction)
pub async fn execute(store: &dyn TransactionalQueueStore, name: &str) -> Result<QueueRecord> {
    let mut tx = store.begin_transaction().await?;

    let record = tx
        .find_by_name(name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Queue with name {} does not exist", name)))?;

    if record.is_reserved() {
        tx.rollback().await?;
        return Err(DomainError::ReservedName(record.name).into());
    }

    let table = TableName::parse(record.table_name.as_str())?;
    tx.drop_request_table(&table).await?;

    if !tx.delete_queue(&record.name).await? {
        return Err(AppError::NotFound(format!(
            "Queue with name {} does not exist",
            name
        )));
    }

    tx.commit().await?;

    Ok(record)
}
