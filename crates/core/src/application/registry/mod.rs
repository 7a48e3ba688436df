// Queue Registry - owns the queue name -> accessor map

pub mod add_queue;
pub mod delete_queue;
pub mod rename_queue;

use crate::domain::{
    queue::validate_description, DomainError, NewQueue, QueueInfo, TableName, ADMIN_QUEUE,
};
use crate::error::{AppError, Result};
use crate::port::{PasswordHasher, RequestRepository, TransactionalQueueStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Registry of queues backed by the metadata table
///
/// Accessors are rebuilt by [`QueueRegistry::load`] after every structural
/// change (add, rename, delete). Map keys are lowercase queue names.
pub struct QueueRegistry {
    store: Arc<dyn TransactionalQueueStore>,
    hasher: Arc<dyn PasswordHasher>,
    queues: RwLock<HashMap<String, Arc<dyn RequestRepository>>>,
}

impl QueueRegistry {
    pub fn new(store: Arc<dyn TransactionalQueueStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            hasher,
            queues: RwLock::new(HashMap::new()),
        }
    }

    /// Create the metadata table (idempotent) and seed the admin credential
    pub async fn create_config_table(&self, admin_password: &str) -> Result<()> {
        if admin_password.is_empty() {
            return Err(DomainError::MissingField("admin password").into());
        }
        self.store
            .create_config_table(&self.hasher.hash(admin_password))
            .await
    }

    /// Rebuild the name -> accessor map from current metadata
    ///
    /// Returns the number of queues loaded.
    pub async fn load(&self) -> Result<usize> {
        // Held across the read so overlapping reloads swap in commit order
        let mut queues = self.queues.write().await;
        let records = self.store.list_queues().await?;
        let mut map: HashMap<String, Arc<dyn RequestRepository>> =
            HashMap::with_capacity(records.len());

        for record in records {
            match TableName::parse(record.table_name.as_str()) {
                Ok(table) => {
                    map.insert(
                        record.name.to_ascii_lowercase(),
                        self.store.open_request_table(&table),
                    );
                }
                Err(e) => {
                    warn!(queue = %record.name, error = %e, "Skipping queue with invalid table name");
                }
            }
        }

        let count = map.len();
        *queues = map;
        debug!(queues = count, "Queue registry loaded");
        Ok(count)
    }

    /// Reload after a committed change; the change stands even if this fails
    async fn reload_after(&self, operation: &'static str) {
        if let Err(e) = self.load().await {
            warn!(operation, error = %e, "Queue registry reload failed after commit");
        }
    }

    /// Accessor for a loaded queue
    pub async fn queue(&self, name: &str) -> Result<Arc<dyn RequestRepository>> {
        self.queues
            .read()
            .await
            .get(&name.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Queue with name {} does not exist", name)))
    }

    /// Create a queue with its backing table, then reload
    pub async fn add_new_queue(&self, req: NewQueue) -> Result<QueueInfo> {
        let info = add_queue::execute(self.store.as_ref(), self.hasher.as_ref(), req).await?;
        info!(queue = %info.name, table = %info.table_name, "Queue created");
        self.reload_after("create").await;
        Ok(info)
    }

    /// Store a precomputed password digest
    pub async fn set_hash(&self, name: &str, hash: &str) -> Result<()> {
        if hash.is_empty() {
            return Err(DomainError::MissingField("hash").into());
        }
        if !self.store.update_hash(name, hash).await? {
            return Err(AppError::NotFound(format!(
                "Queue with name {} does not exist",
                name
            )));
        }
        info!(queue = %name, "Queue password changed");
        Ok(())
    }

    /// Hash and store a new password
    pub async fn set_password(&self, name: &str, password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(DomainError::MissingField("password").into());
        }
        self.set_hash(name, &self.hasher.hash(password)).await
    }

    /// Set or clear (`None`) the description of a queue
    pub async fn set_description(&self, name: &str, description: Option<&str>) -> Result<()> {
        if name.eq_ignore_ascii_case(ADMIN_QUEUE) {
            return Err(DomainError::ReservedName(name.to_string()).into());
        }
        validate_description(description)?;
        if !self.store.update_description(name, description).await? {
            return Err(AppError::NotFound(format!(
                "Queue with name {} does not exist",
                name
            )));
        }
        Ok(())
    }

    /// Rename a queue, then reload
    pub async fn set_queue_name(&self, old_name: &str, new_name: &str) -> Result<()> {
        rename_queue::execute(self.store.as_ref(), old_name, new_name).await?;
        info!(from = %old_name, to = %new_name, "Queue renamed");
        self.reload_after("rename").await;
        Ok(())
    }

    /// Drop the backing table and metadata row, then reload
    pub async fn delete_queue(&self, name: &str) -> Result<()> {
        let record = delete_queue::execute(self.store.as_ref(), name).await?;
        info!(queue = %record.name, table = %record.table_name, "Queue deleted");
        self.reload_after("delete").await;
        Ok(())
    }

    /// All non-reserved queues
    pub async fn get_all_queues(&self) -> Result<Vec<QueueInfo>> {
        Ok(self
            .store
            .list_queues()
            .await?
            .into_iter()
            .map(QueueInfo::from)
            .collect())
    }

    /// Check `password` against the stored digest of queue `name`
    pub async fn validate_password(&self, name: &str, password: &str) -> Result<()> {
        let record = self
            .store
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Queue with name {} does not exist", name)))?;

        if self.hasher.verify(password, &record.hash) {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "Invalid password for queue {}",
                name
            )))
        }
    }

    /// Accept either the queue's own password or the admin password
    pub async fn authorize(&self, name: &str, password: &str) -> Result<()> {
        match self.validate_password(name, password).await {
            Err(AppError::Unauthorized(msg)) => {
                if self.validate_password(ADMIN_QUEUE, password).await.is_ok() {
                    debug!(queue = %name, "Authorized with admin credential");
                    Ok(())
                } else {
                    warn!(queue = %name, "Rejected password");
                    Err(AppError::Unauthorized(msg))
                }
            }
            other => other,
        }
    }
}
