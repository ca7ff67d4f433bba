//! # GBan Runtime
//!
//! Entry point of the global ban bot.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (tracing + Prometheus registry)
//! 2. Load configuration from the environment and validate it
//! 3. Open the configured storage backend
//! 4. Build the service container in dependency order
//! 5. Leave every server that is not whitelisted
//! 6. Wait for Ctrl+C or a fatal error, then shut down
//!
//! The binary runs against a loopback chat platform that records every
//! call. A gateway client implementing `ChatPlatform` and
//! `PermissionSource` replaces it in a deployment.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{debug, error, info};

use gb_03_authorization::StaticPermissionSource;
use gb_04_propagation::RecordingChatPlatform;
use gban_runtime::{NodeJoinHandler, RuntimeConfig, ServiceContainer, Stores};
use gban_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use shared_types::NodeRef;

/// The bot runtime.
struct GbanRuntime {
    /// Every initialized subsystem.
    container: Arc<ServiceContainer>,
    /// Startup and membership handling.
    node_join: NodeJoinHandler,
    /// Flipped to `true` when a fatal error is escalated.
    shutdown_rx: watch::Receiver<bool>,
}

impl GbanRuntime {
    /// Open storage and build every subsystem.
    async fn new(config: RuntimeConfig) -> Result<Self> {
        let main_node = config.bot.main_node_id;
        let stores = Stores::open(&config.storage).context("Failed to open storage")?;

        let platform = Arc::new(RecordingChatPlatform::new());
        platform.add_node(NodeRef::new(main_node, "Main server"));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let container = Arc::new(
            ServiceContainer::build(
                config,
                stores,
                platform,
                Arc::new(StaticPermissionSource::new()),
                shutdown_tx,
            )
            .await
            .context("Failed to build service container")?,
        );

        Ok(Self {
            node_join: NodeJoinHandler::new(container.clone()),
            container,
            shutdown_rx,
        })
    }

    /// Bring membership in line with the whitelist.
    async fn start(&self) {
        info!("===========================================");
        info!("  GBan Runtime v{}", gban_runtime::VERSION);
        info!("  Main server: {}", self.container.config.bot.main_node_id);
        info!("===========================================");

        let left = self.node_join.reconcile_on_startup().await;
        if !left.is_empty() {
            info!(count = left.len(), "[runtime] Left non-whitelisted servers");
        }
    }

    /// Block until Ctrl+C or a fatal error.
    async fn wait_for_shutdown(&self) -> Result<()> {
        let mut fatal = self.shutdown_rx.clone();
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl+C")?;
                info!("[runtime] Ctrl+C received");
            }
            _ = fatal.wait_for(|stop| *stop) => {
                error!("[runtime] Fatal error escalated, stopping");
            }
        }
        Ok(())
    }

    /// Signal shutdown and flush final metrics to the log.
    async fn shutdown(&self) {
        info!("[runtime] Initiating graceful shutdown...");
        self.container.errors.trigger_shutdown();
        match encode_metrics() {
            Ok(text) => debug!(metrics = %text, "[runtime] Final metrics"),
            Err(e) => error!(error = %e, "[runtime] Failed to encode metrics"),
        }
        info!("[runtime] Shutdown complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let runtime = GbanRuntime::new(config).await?;
    runtime.start().await;

    info!("[runtime] Bot is running. Press Ctrl+C to stop.");
    runtime.wait_for_shutdown().await?;
    runtime.shutdown().await;

    Ok(())
}
