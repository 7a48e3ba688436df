// Domain Layer - Queue metadata, student requests and identifier rules

pub mod error;
pub mod queue;
pub mod request;

// Re-exports
pub use error::DomainError;
pub use queue::{
    check_name, NewQueue, QueueInfo, QueueName, QueueRecord, TableName, ADMIN_QUEUE,
    METADATA_TABLE,
};
pub use request::{NewRequest, StudentRequest};
