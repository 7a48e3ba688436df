//! JSON-RPC Server
//!
//! Serves the queue methods over HTTP on localhost.

use crate::handler::RpcHandler;
use crate::rate_limiter::SubmissionLimiter;
use crate::types::{
    AddRequestRequest, ChangePasswordRequest, CreateQueueRequest, DescribeQueueRequest,
    QueueAuthRequest, RemoveRequestRequest, RenameQueueRequest,
};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::sync::Arc;
use studentqueue_core::application::QueueRegistry;
use tracing::info;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9531;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// Registers `$method` so that its params are parsed into `$req` and handed to `$call`
macro_rules! register {
    ($module:ident, $handler:expr, $method:literal, $req:ty, $call:ident) => {{
        let handler = $handler.clone();
        $module
            .register_async_method($method, move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: $req = params.parse()?;
                    handler.$call(req).await
                }
            })
            .map_err(|e| e.to_string())?;
    }};
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        registry: Arc<QueueRegistry>,
        limiter: Arc<SubmissionLimiter>,
    ) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(registry, limiter)),
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Binds to the configured host only; the default is loopback.
    pub async fn start(self) -> Result<ServerHandle, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;

        let module = self.build_module()?;

        info!("JSON-RPC server started successfully");

        Ok(server.start(module))
    }

    fn build_module(&self) -> Result<RpcModule<()>, String> {
        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method("queue.list.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.list_queues().await }
            })
            .map_err(|e| e.to_string())?;

        register!(module, self.handler, "queue.create.v1", CreateQueueRequest, create_queue);
        register!(module, self.handler, "queue.delete.v1", QueueAuthRequest, delete_queue);
        register!(module, self.handler, "queue.rename.v1", RenameQueueRequest, rename_queue);
        register!(module, self.handler, "queue.describe.v1", DescribeQueueRequest, describe_queue);
        register!(module, self.handler, "queue.password.v1", ChangePasswordRequest, change_password);
        register!(module, self.handler, "queue.login.v1", QueueAuthRequest, login);

        register!(module, self.handler, "request.add.v1", AddRequestRequest, add_request);
        register!(module, self.handler, "request.remove.v1", RemoveRequestRequest, remove_request);
        register!(module, self.handler, "request.list.v1", QueueAuthRequest, list_requests);
        register!(module, self.handler, "request.reset.v1", QueueAuthRequest, reset_queue);

        Ok(module)
    }
}
