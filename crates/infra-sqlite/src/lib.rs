// Student Queue Infrastructure - SQLite Adapter
// Implements: QueueStore, TransactionalQueueStore, RequestRepository

mod connection;
mod error;
mod migration;
mod queue_store;
mod request_table;
mod transaction;

pub use connection::create_pool;
pub use error::map_sqlx_error;
pub use migration::{run_migrations, seed_admin};
pub use queue_store::SqliteQueueStore;
pub use request_table::SqliteRequestTable;
pub use transaction::SqliteQueueTransaction;

// Note: sqlx::Error conversion is handled by map_sqlx_error
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
