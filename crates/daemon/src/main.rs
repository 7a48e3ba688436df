//! Student Queue Daemon - Main Entry Point

mod config;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{DaemonConfig, LogFormat};
use studentqueue_api_rpc::{RpcServer, RpcServerConfig, SubmissionLimiter};
use studentqueue_core::application::QueueRegistry;
use studentqueue_core::port::{Sha256PasswordHasher, SystemTimeProvider};
use studentqueue_infra_sqlite::{create_pool, SqliteQueueStore};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_FILE_PREFIX: &str = "studentqueued.log";

#[tokio::main]
async fn main() -> Result<()> {
    let config = DaemonConfig::from_env();

    // 1. Initialize logging
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("studentqueue=info"))?;

    // Guard must live until shutdown so buffered lines get flushed
    let (file_layer, _log_guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    match config.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Student Queue daemon v{} starting...", VERSION);
    config.warn_on_defaults();

    // 2. Initialize database
    info!(db_path = %config.db_path, "Initializing database...");
    if let Some(parent) = std::path::Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let pool = create_pool(&config.database_url(), config.db_max_connections)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;

    // 3. Wire dependencies
    let time_provider = Arc::new(SystemTimeProvider);
    let store = Arc::new(SqliteQueueStore::new(pool.clone(), time_provider.clone()));
    let registry = Arc::new(QueueRegistry::new(store, Arc::new(Sha256PasswordHasher)));

    registry
        .create_config_table(&config.admin_password)
        .await
        .map_err(|e| anyhow::anyhow!("Config table setup failed: {}", e))?;
    let loaded = registry
        .load()
        .await
        .map_err(|e| anyhow::anyhow!("Loading queues failed: {}", e))?;
    info!(queues = loaded, "Queues loaded");

    let limiter = Arc::new(SubmissionLimiter::new(
        config.rate_limit_burst,
        config.rate_limit_rate,
        time_provider,
    ));

    // 4. Start JSON-RPC server
    let rpc_config = RpcServerConfig {
        host: config.rpc_host.clone(),
        port: config.rpc_port,
    };
    let rpc_handle = RpcServer::new(rpc_config, registry, limiter)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!("System ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;
    pool.close().await;

    info!("Shutdown complete.");

    Ok(())
}
