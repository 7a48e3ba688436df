// Rename Queue Use Case

use crate::domain::QueueName;
use crate::error::{AppError, Result};
use crate::port::TransactionalQueueStore;

/// Rename a queue; the backing table keeps its name
pub async fn execute(
    store: &dyn TransactionalQueueStore,
    old_name: &str,
    new_name: &str,
) -> Result<()> {
    let new_name = QueueName::parse(new_name)?;

    let mut tx = store.begin_transaction().await?;

    let current = tx
        .find_by_name(old_name)
        .await?
        .filter(|q| !q.is_reserved())
        .ok_or_else(|| {
            AppError::NotFound(format!("Queue with name {} does not exist", old_name))
        })?;

    // Lookups are case-insensitive, so a case-only rename finds the queue itself
    if let Some(existing) = tx.find_by_name(new_name.as_str()).await? {
        if existing.table_name != current.table_name {
            tx.rollback().await?;
            return Err(AppError::Conflict(format!(
                "Queue with name {} already exists",
                new_name
            )));
        }
    }

    if current.name == new_name.as_str() {
        tx.rollback().await?;
        return Ok(());
    }

    if !tx.rename_queue(&current.name, new_name.as_str()).await? {
        return Err(AppError::NotFound(format!(
            "Queue with name {} does not exist",
            old_name
        )));
    }

    tx.commit().await
}
