//! Shared fixtures for the end-to-end tests

use std::path::PathBuf;
use std::sync::Arc;
use studentqueue_core::application::QueueRegistry;
use studentqueue_core::port::{Sha256PasswordHasher, SystemTimeProvider, TimeProvider};
use studentqueue_infra_sqlite::{create_pool, SqliteQueueStore};
use sqlx::SqlitePool;

pub const ADMIN_PASSWORD: &str = "admin-pw";

/// Registry over a fresh in-memory database, config table seeded
pub async fn memory_registry() -> (Arc<QueueRegistry>, SqlitePool) {
    registry_at("sqlite::memory:", Arc::new(SystemTimeProvider)).await
}

pub async fn registry_at(
    url: &str,
    time_provider: Arc<dyn TimeProvider>,
) -> (Arc<QueueRegistry>, SqlitePool) {
    let pool = create_pool(url, 4).await.expect("pool");
    let store = Arc::new(SqliteQueueStore::new(pool.clone(), time_provider));
    let registry = Arc::new(QueueRegistry::new(store, Arc::new(Sha256PasswordHasher)));
    registry
        .create_config_table(ADMIN_PASSWORD)
        .await
        .expect("config table");
    registry.load().await.expect("load");
    (registry, pool)
}

/// Whether `table` exists in the database (case-insensitive)
pub async fn table_exists(pool: &SqlitePool, table: &str) -> bool {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ? COLLATE NOCASE",
    )
    .bind(table)
    .fetch_one(pool)
    .await
    .expect("sqlite_master");
    count > 0
}

/// SQLite file in the temp dir, removed on drop
pub struct TempDb {
    path: PathBuf,
}

impl TempDb {
    pub fn new(tag: &str) -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Self {
            path: std::env::temp_dir().join(format!(
                "studentqueue-{}-{}-{}.db",
                tag,
                std::process::id(),
                nanos
            )),
        }
    }

    pub fn url(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.path.display(), suffix));
        }
    }
}
