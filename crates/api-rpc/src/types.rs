//! RPC Request/Response Types

use serde::{Deserialize, Serialize};
use studentqueue_core::domain::StudentRequest;

/// queue.list.v1 - one entry per queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSummary {
    pub name: String,
    pub description: Option<String>,
    pub waiting: i64,
}

/// queue.create.v1
#[derive(Debug, Deserialize)]
pub struct CreateQueueRequest {
    pub admin_password: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub table_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateQueueResponse {
    pub name: String,
    pub table_name: String,
}

/// Queue name plus a password (queue's own or admin)
///
/// Used by queue.delete.v1, queue.login.v1, request.list.v1, request.reset.v1
#[derive(Debug, Deserialize)]
pub struct QueueAuthRequest {
    pub queue: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueDeletedResponse {
    pub queue: String,
    pub deleted: bool,
}

/// queue.rename.v1
#[derive(Debug, Deserialize)]
pub struct RenameQueueRequest {
    pub queue: String,
    pub password: String,
    pub new_name: String,
}

/// queue.describe.v1 - omitted description clears it
#[derive(Debug, Deserialize)]
pub struct DescribeQueueRequest {
    pub queue: String,
    pub password: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// queue.password.v1
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub queue: String,
    pub password: String,
    pub new_password: String,
}

/// Acknowledgement for queue updates
#[derive(Debug, Clone, Serialize)]
pub struct QueueUpdatedResponse {
    pub queue: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub queue: String,
    pub valid: bool,
}

/// request.add.v1 - public, rate limited
#[derive(Debug, Deserialize)]
pub struct AddRequestRequest {
    pub queue: String,
    pub id: String,
    pub name: String,
    pub problem: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddRequestResponse {
    pub queue: String,
    pub id: String,
    /// 1-based place in line
    pub position: i64,
}

/// request.remove.v1
#[derive(Debug, Deserialize)]
pub struct RemoveRequestRequest {
    pub queue: String,
    pub password: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveRequestResponse {
    pub queue: String,
    pub id: String,
    pub removed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListRequestsResponse {
    pub queue: String,
    pub requests: Vec<StudentRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetQueueResponse {
    pub queue: String,
    pub removed: u64,
}
