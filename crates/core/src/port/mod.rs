// Port Layer - Interfaces for external dependencies

pub mod password_hasher;
pub mod queue_store;
pub mod request_repository;
pub mod time_provider; // For deterministic request timestamps
pub mod transaction;

// Re-exports
pub use password_hasher::{PasswordHasher, Sha256PasswordHasher};
pub use queue_store::QueueStore;
pub use request_repository::RequestRepository;
pub use time_provider::{SystemTimeProvider, TimeProvider};
pub use transaction::{QueueStoreTransaction, Transaction, TransactionalQueueStore};
