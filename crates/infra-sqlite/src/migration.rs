// Metadata table bootstrap

use sqlx::SqlitePool;
use studentqueue_core::domain::{ADMIN_QUEUE, METADATA_TABLE};
use studentqueue_core::error::Result;
use tracing::info;

use crate::map_sqlx_error;

// name / table_name compare case-insensitively, like identifiers do in SQLite
const CREATE_METADATA_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS queues (
    name        TEXT NOT NULL COLLATE NOCASE UNIQUE,
    table_name  TEXT NOT NULL COLLATE NOCASE PRIMARY KEY,
    hash        TEXT NOT NULL,
    description TEXT NULL
)
"#;

/// Create the metadata table if it does not exist (idempotent)
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_METADATA_TABLE)
        .execute(pool)
        .await
        .map_err(map_sqlx_error)?;

    info!(table = METADATA_TABLE, "Metadata table ready");
    Ok(())
}

/// Seed the admin credential; an existing admin row is left untouched
///
/// Returns true if the row was inserted.
pub async fn seed_admin(pool: &SqlitePool, admin_hash: &str) -> Result<bool> {
    let result =
        sqlx::query("INSERT OR IGNORE INTO queues (name, table_name, hash) VALUES (?, ?, ?)")
            .bind(ADMIN_QUEUE)
            .bind(METADATA_TABLE)
            .bind(admin_hash)
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;

    let seeded = result.rows_affected() > 0;
    if seeded {
        info!("Admin credential seeded");
    }
    Ok(seeded)
}
