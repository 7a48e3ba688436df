// Application Layer - Use Cases and Business Logic

pub mod registry;

// Re-exports
pub use registry::QueueRegistry;
