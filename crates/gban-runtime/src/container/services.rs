//! # Service Container
//!
//! Holds every subsystem instance and wires them together.
//!
//! ## Initialization Order
//!
//! ```text
//! Stores:        trust edges, whitelist, settings (memory or RocksDB)
//! Level 1:       Trust Graph (GB-01), loaded from the trust store
//! Level 2:       Node Registry (GB-05): whitelist + settings
//! Level 3:       Authorization Resolver (GB-03)
//! Level 4:       Propagation (GB-04) over all of the above
//! ```
//!
//! Construction is explicit and happens once; nothing is initialized lazily.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, instrument};

use gb_01_trust_graph::{InMemoryTrustStore, TrustError, TrustGraph, TrustStore};
use gb_03_authorization::{AuthorizationResolver, PermissionSource};
use gb_04_propagation::{ChatPlatform, PropagationService};
use gb_05_node_registry::{
    InMemorySettingsStore, InMemoryWhitelistStore, RegistryError, SettingsRegistry,
    SettingsStore, Whitelist, WhitelistStore,
};
use gban_telemetry::TRUST_EDGES;
use shared_types::StoreError;
use thiserror::Error;

use crate::adapters::{ErrorChannel, SettingsDirectory};
use crate::container::config::{ConfigError, RuntimeConfig, StorageBackend, StorageConfig};

/// Errors raised while building the container.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Opening the storage backend failed.
    #[error("Failed to open storage: {0}")]
    Storage(#[from] StoreError),

    /// Loading the trust graph failed.
    #[error("Failed to load trust graph: {0}")]
    Trust(#[from] TrustError),

    /// Loading the whitelist or settings failed.
    #[error("Failed to load node registry: {0}")]
    Registry(#[from] RegistryError),
}

/// Persistence ports for every stateful subsystem.
#[derive(Clone)]
pub struct Stores {
    /// Trust edges.
    pub trust: Arc<dyn TrustStore>,
    /// Whitelisted nodes.
    pub whitelist: Arc<dyn WhitelistStore>,
    /// Per-node settings.
    pub settings: Arc<dyn SettingsStore>,
}

impl Stores {
    /// Empty process-local stores.
    pub fn in_memory() -> Self {
        Self {
            trust: Arc::new(InMemoryTrustStore::new()),
            whitelist: Arc::new(InMemoryWhitelistStore::new()),
            settings: Arc::new(InMemorySettingsStore::new()),
        }
    }

    /// One RocksDB database behind all three ports.
    #[cfg(feature = "rocksdb")]
    pub fn rocksdb(path: &std::path::Path) -> Result<Self, StoreError> {
        use crate::adapters::storage::{RocksDbConfig, RocksDbStore};

        let db = Arc::new(RocksDbStore::open(RocksDbConfig::new(path))?);
        Ok(Self {
            trust: db.clone(),
            whitelist: db.clone(),
            settings: db,
        })
    }

    /// Open the configured backend.
    pub fn open(config: &StorageConfig) -> Result<Self, ContainerError> {
        match &config.backend {
            StorageBackend::Memory => Ok(Self::in_memory()),
            #[cfg(feature = "rocksdb")]
            StorageBackend::RocksDb { path } => Ok(Self::rocksdb(path)?),
            #[cfg(not(feature = "rocksdb"))]
            StorageBackend::RocksDb { .. } => Err(ConfigError::RocksDbUnavailable.into()),
        }
    }
}

/// Every subsystem of a running bot.
pub struct ServiceContainer {
    /// Runtime configuration (immutable after initialization).
    pub config: RuntimeConfig,
    /// Chat platform shared by every subsystem.
    pub platform: Arc<dyn ChatPlatform>,
    /// Trust Graph (Subsystem 1)
    pub trust: Arc<TrustGraph>,
    /// Whitelist (Subsystem 5)
    pub whitelist: Arc<Whitelist>,
    /// Node settings (Subsystem 5)
    pub settings: Arc<SettingsRegistry>,
    /// Authorization Resolver (Subsystem 3)
    pub authorization: Arc<AuthorizationResolver>,
    /// Operational error channel.
    pub errors: Arc<ErrorChannel>,
    /// Propagation (Subsystem 4)
    pub propagation: Arc<PropagationService>,
}

impl ServiceContainer {
    /// Build every subsystem in dependency order.
    ///
    /// `shutdown` is flipped to `true` when a fatal error is escalated.
    #[instrument(name = "container_build", skip_all)]
    pub async fn build(
        config: RuntimeConfig,
        stores: Stores,
        platform: Arc<dyn ChatPlatform>,
        permissions: Arc<dyn PermissionSource>,
        shutdown: watch::Sender<bool>,
    ) -> Result<Self, ContainerError> {
        config.validate()?;
        let main_node = config.bot.main_node_id;

        info!("[runtime] Level 1: loading trust graph");
        let trust = Arc::new(TrustGraph::load(stores.trust).await?);
        TRUST_EDGES.set(trust.edge_count() as f64);

        info!("[runtime] Level 2: loading node registry");
        let whitelist = Arc::new(Whitelist::load(stores.whitelist, main_node).await?);
        let settings = Arc::new(SettingsRegistry::load(stores.settings).await?);

        info!("[runtime] Level 3: authorization resolver");
        let authorization = Arc::new(AuthorizationResolver::new(permissions));

        info!("[runtime] Level 4: propagation");
        let errors = Arc::new(ErrorChannel::new(
            platform.clone(),
            main_node,
            config.bot.error_channel,
            shutdown,
        ));
        let propagation = Arc::new(PropagationService::new(
            trust.clone(),
            authorization.clone(),
            platform.clone(),
            Arc::new(SettingsDirectory::new(settings.clone())),
            errors.clone(),
            config.propagation.clone(),
        ));

        info!(
            main_node = %main_node,
            trust_edges = trust.edge_count(),
            whitelisted = whitelist.all_nodes().len(),
            "[runtime] Service container ready"
        );

        Ok(Self {
            config,
            platform,
            trust,
            whitelist,
            settings,
            authorization,
            errors,
            propagation,
        })
    }

    /// Refresh the trust-edge gauge after a mutation.
    pub fn record_trust_edges(&self) {
        TRUST_EDGES.set(self.trust.edge_count() as f64);
    }
}
