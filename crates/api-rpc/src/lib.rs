//! JSON-RPC API Layer
//!
//! Implements the JSON-RPC 2.0 server in front of the queue registry.

pub mod error;
pub mod handler;
pub mod rate_limiter;
pub mod server;
pub mod types;

pub use rate_limiter::SubmissionLimiter;
pub use server::{RpcServer, RpcServerConfig};
