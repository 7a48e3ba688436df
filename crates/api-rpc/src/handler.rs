//! RPC Method Handlers
//!
//! Password checks happen here; the registry does the rest.

use crate::error::{throttled, to_rpc_error};
use crate::rate_limiter::SubmissionLimiter;
use crate::types::{
    AddRequestRequest, AddRequestResponse, ChangePasswordRequest, CreateQueueRequest,
    CreateQueueResponse, DescribeQueueRequest, ListRequestsResponse, LoginResponse,
    QueueAuthRequest, QueueDeletedResponse, QueueSummary, QueueUpdatedResponse,
    RemoveRequestRequest, RemoveRequestResponse, RenameQueueRequest, ResetQueueResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use studentqueue_core::application::QueueRegistry;
use studentqueue_core::domain::{NewQueue, NewRequest, ADMIN_QUEUE};
use studentqueue_core::error::AppError;
use tracing::{info, warn};

type RpcResult<T> = Result<T, ErrorObjectOwned>;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    registry: Arc<QueueRegistry>,
    limiter: Arc<SubmissionLimiter>,
}

impl RpcHandler {
    pub fn new(registry: Arc<QueueRegistry>, limiter: Arc<SubmissionLimiter>) -> Self {
        Self { registry, limiter }
    }

    async fn authorize(&self, queue: &str, password: &str) -> RpcResult<()> {
        self.registry
            .authorize(queue, password)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.list.v1
    pub async fn list_queues(&self) -> RpcResult<Vec<QueueSummary>> {
        let queues = self.registry.get_all_queues().await.map_err(to_rpc_error)?;

        let mut summaries = Vec::with_capacity(queues.len());
        for queue in queues {
            // Listed but not yet loaded (reload failed after commit)
            let waiting = match self.registry.queue(&queue.name).await {
                Ok(repo) => repo.count().await.map_err(to_rpc_error)?,
                Err(AppError::NotFound(_)) => 0,
                Err(e) => return Err(to_rpc_error(e)),
            };
            summaries.push(QueueSummary {
                name: queue.name,
                description: queue.description,
                waiting,
            });
        }
        Ok(summaries)
    }

    /// queue.create.v1 (admin only)
    pub async fn create_queue(&self, params: CreateQueueRequest) -> RpcResult<CreateQueueResponse> {
        self.registry
            .validate_password(ADMIN_QUEUE, &params.admin_password)
            .await
            .map_err(|e| {
                warn!(queue = %params.name, "Queue creation rejected");
                to_rpc_error(match e {
                    AppError::NotFound(_) => {
                        AppError::Unauthorized("Admin credential not configured".to_string())
                    }
                    other => other,
                })
            })?;

        let info = self
            .registry
            .add_new_queue(NewQueue {
                name: params.name,
                password: params.password,
                description: params.description,
                table_name: params.table_name,
            })
            .await
            .map_err(to_rpc_error)?;

        Ok(CreateQueueResponse {
            name: info.name,
            table_name: info.table_name,
        })
    }

    /// queue.delete.v1
    pub async fn delete_queue(&self, params: QueueAuthRequest) -> RpcResult<QueueDeletedResponse> {
        self.authorize(&params.queue, &params.password).await?;
        self.registry
            .delete_queue(&params.queue)
            .await
            .map_err(to_rpc_error)?;
        self.limiter.forget(&params.queue).await;

        Ok(QueueDeletedResponse {
            queue: params.queue,
            deleted: true,
        })
    }

    /// queue.rename.v1
    pub async fn rename_queue(&self, params: RenameQueueRequest) -> RpcResult<QueueUpdatedResponse> {
        self.authorize(&params.queue, &params.password).await?;
        self.registry
            .set_queue_name(&params.queue, &params.new_name)
            .await
            .map_err(to_rpc_error)?;
        self.limiter.forget(&params.queue).await;

        Ok(QueueUpdatedResponse {
            queue: params.new_name,
        })
    }

    /// queue.describe.v1
    pub async fn describe_queue(
        &self,
        params: DescribeQueueRequest,
    ) -> RpcResult<QueueUpdatedResponse> {
        self.authorize(&params.queue, &params.password).await?;
        self.registry
            .set_description(&params.queue, params.description.as_deref())
            .await
            .map_err(to_rpc_error)?;

        Ok(QueueUpdatedResponse {
            queue: params.queue,
        })
    }

    /// queue.password.v1
    pub async fn change_password(
        &self,
        params: ChangePasswordRequest,
    ) -> RpcResult<QueueUpdatedResponse> {
        self.authorize(&params.queue, &params.password).await?;
        self.registry
            .set_password(&params.queue, &params.new_password)
            .await
            .map_err(to_rpc_error)?;

        Ok(QueueUpdatedResponse {
            queue: params.queue,
        })
    }

    /// queue.login.v1 - checks the queue's own password only
    pub async fn login(&self, params: QueueAuthRequest) -> RpcResult<LoginResponse> {
        let valid = match self
            .registry
            .validate_password(&params.queue, &params.password)
            .await
        {
            Ok(()) => true,
            Err(AppError::Unauthorized(_)) => false,
            Err(e) => return Err(to_rpc_error(e)),
        };

        Ok(LoginResponse {
            queue: params.queue,
            valid,
        })
    }

    /// request.add.v1
    pub async fn add_request(&self, params: AddRequestRequest) -> RpcResult<AddRequestResponse> {
        // Unknown queues never get a bucket
        let repo = self
            .registry
            .queue(&params.queue)
            .await
            .map_err(to_rpc_error)?;

        if !self.limiter.check(&params.queue).await {
            warn!(queue = %params.queue, "Submission rate limit hit");
            return Err(throttled());
        }

        let request = NewRequest::new(params.id, params.name, params.problem);
        repo.add(&request).await.map_err(to_rpc_error)?;
        let position = repo.count().await.map_err(to_rpc_error)?;

        info!(queue = %params.queue, position, "Request added");

        Ok(AddRequestResponse {
            queue: params.queue,
            id: request.id,
            position,
        })
    }

    /// request.remove.v1
    pub async fn remove_request(
        &self,
        params: RemoveRequestRequest,
    ) -> RpcResult<RemoveRequestResponse> {
        self.authorize(&params.queue, &params.password).await?;
        let repo = self
            .registry
            .queue(&params.queue)
            .await
            .map_err(to_rpc_error)?;
        repo.remove(&params.id).await.map_err(to_rpc_error)?;

        Ok(RemoveRequestResponse {
            queue: params.queue,
            id: params.id,
            removed: true,
        })
    }

    /// request.list.v1
    pub async fn list_requests(&self, params: QueueAuthRequest) -> RpcResult<ListRequestsResponse> {
        self.authorize(&params.queue, &params.password).await?;
        let repo = self
            .registry
            .queue(&params.queue)
            .await
            .map_err(to_rpc_error)?;
        let requests = repo.get_all().await.map_err(to_rpc_error)?;

        Ok(ListRequestsResponse {
            queue: params.queue,
            requests,
        })
    }

    /// request.reset.v1
    pub async fn reset_queue(&self, params: QueueAuthRequest) -> RpcResult<ResetQueueResponse> {
        self.authorize(&params.queue, &params.password).await?;
        let repo = self
            .registry
            .queue(&params.queue)
            .await
            .map_err(to_rpc_error)?;
        let removed = repo.reset().await.map_err(to_rpc_error)?;

        info!(queue = %params.queue, removed, "Queue reset");

        Ok(ResetQueueResponse {
            queue: params.queue,
            removed,
        })
    }
}
