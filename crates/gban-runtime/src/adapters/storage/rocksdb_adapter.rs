//! # RocksDB Storage Adapter
//!
//! One database implementing every persistence port of the bot.
//!
//! ## Column Families
//!
//! | Family | Key | Value |
//! |--------|-----|-------|
//! | `trusted_nodes` | source BE ++ destination BE | empty |
//! | `whitelist` | node BE | empty |
//! | `settings` | node BE | JSON [`NodeSettings`] |
//!
//! Big-endian keys make a full scan of `trusted_nodes` yield edges sorted by
//! source, which is the order the trust graph loader expects.
//!
//! `reconnect()` closes and reopens the database.

use async_trait::async_trait;
use gb_01_trust_graph::{TrustEdge, TrustStore};
use gb_05_node_registry::{NodeSettings, SettingsStore, WhitelistStore};
use gban_telemetry::{metric_inc, STORE_RECONNECTS};
use parking_lot::RwLock;
use rocksdb::{ColumnFamilyDescriptor, IteratorMode, Options, WriteOptions, DB};
use shared_types::{NodeId, Reconnect, StoreError};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directed trust edges.
pub const CF_TRUSTED_NODES: &str = "trusted_nodes";
/// Whitelisted nodes.
pub const CF_WHITELIST: &str = "whitelist";
/// Per-node settings.
pub const CF_SETTINGS: &str = "settings";

/// All column families used by the bot
pub const COLUMN_FAMILIES: &[&str] = &[CF_TRUSTED_NODES, CF_WHITELIST, CF_SETTINGS];

/// RocksDB configuration.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl RocksDbConfig {
    /// Durable configuration at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sync_writes: true,
        }
    }

    /// Create config for testing (no sync)
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sync_writes: false,
        }
    }
}

fn open_db(path: &Path) -> Result<DB, StoreError> {
    let mut opts = Options::default();
    opts.create_if_missing(true);
    opts.create_missing_column_families(true);
    opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

    let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
        .iter()
        .map(|name| {
            let mut cf_opts = Options::default();
            cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
            ColumnFamilyDescriptor::new(*name, cf_opts)
        })
        .collect();

    DB::open_cf_descriptors(&opts, path, cf_descriptors)
        .map_err(|e| StoreError::Disconnected(format!("Failed to open RocksDB: {}", e)))
}

fn edge_key(edge: TrustEdge) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&edge.source.get().to_be_bytes());
    key[8..].copy_from_slice(&edge.destination.get().to_be_bytes());
    key
}

fn node_key(node: NodeId) -> [u8; 8] {
    node.get().to_be_bytes()
}

fn decode_u64(bytes: &[u8]) -> Result<u64, StoreError> {
    let array: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StoreError::Query(format!("Malformed key of {} bytes", bytes.len())))?;
    Ok(u64::from_be_bytes(array))
}

fn decode_edge(key: &[u8]) -> Result<TrustEdge, StoreError> {
    if key.len() != 16 {
        return Err(StoreError::Query(format!(
            "Malformed edge key of {} bytes",
            key.len()
        )));
    }
    Ok(TrustEdge::new(
        NodeId(decode_u64(&key[..8])?),
        NodeId(decode_u64(&key[8..])?),
    ))
}

fn query_error(operation: &str, e: rocksdb::Error) -> StoreError {
    StoreError::Query(format!("RocksDB {} failed: {}", operation, e))
}

/// RocksDB-backed store for trust edges, the whitelist and node settings.
pub struct RocksDbStore {
    db: RwLock<Option<DB>>,
    config: RocksDbConfig,
}

impl RocksDbStore {
    /// Open or create the database.
    pub fn open(config: RocksDbConfig) -> Result<Self, StoreError> {
        let db = open_db(&config.path)?;
        info!(path = %config.path.display(), "[runtime] RocksDB opened");
        Ok(Self {
            db: RwLock::new(Some(db)),
            config,
        })
    }

    /// Open with durable defaults.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open(RocksDbConfig::new(path.as_ref()))
    }

    fn write_options(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }

    fn with_db<T>(
        &self,
        family: &str,
        f: impl FnOnce(&DB, &rocksdb::ColumnFamily) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let guard = self.db.read();
        let db = guard
            .as_ref()
            .ok_or_else(|| StoreError::Disconnected("RocksDB is closed".into()))?;
        let cf = db
            .cf_handle(family)
            .ok_or_else(|| StoreError::Query(format!("Missing column family {}", family)))?;
        f(db, cf)
    }

    fn scan<T>(
        &self,
        family: &str,
        mut decode: impl FnMut(&[u8], &[u8]) -> Result<T, StoreError>,
    ) -> Result<Vec<T>, StoreError> {
        self.with_db(family, |db, cf| {
            db.iterator_cf(cf, IteratorMode::Start)
                .map(|item| {
                    let (key, value) = item.map_err(|e| query_error("scan", e))?;
                    decode(&key, &value)
                })
                .collect()
        })
    }

    fn put(&self, family: &str, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let opts = self.write_options();
        self.with_db(family, |db, cf| {
            db.put_cf_opt(cf, key, value, &opts)
                .map_err(|e| query_error("put", e))
        })
    }

    fn delete(&self, family: &str, key: &[u8]) -> Result<(), StoreError> {
        let opts = self.write_options();
        self.with_db(family, |db, cf| {
            db.delete_cf_opt(cf, key, &opts)
                .map_err(|e| query_error("delete", e))
        })
    }
}

#[async_trait]
impl Reconnect for RocksDbStore {
    async fn reconnect(&self) -> Result<(), StoreError> {
        metric_inc!(STORE_RECONNECTS);
        let mut guard = self.db.write();
        // The old handle must be closed before the directory lock can be reacquired.
        guard.take();
        match open_db(&self.config.path) {
            Ok(db) => {
                *guard = Some(db);
                info!(path = %self.config.path.display(), "[runtime] RocksDB reopened");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "[runtime] RocksDB reopen failed");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl TrustStore for RocksDbStore {
    async fn read_edges(&self) -> Result<Vec<TrustEdge>, StoreError> {
        self.scan(CF_TRUSTED_NODES, |key, _| decode_edge(key))
    }

    async fn upsert_edge(&self, edge: TrustEdge) -> Result<(), StoreError> {
        self.put(CF_TRUSTED_NODES, &edge_key(edge), &[])
    }

    async fn delete_edge(&self, edge: TrustEdge) -> Result<(), StoreError> {
        self.delete(CF_TRUSTED_NODES, &edge_key(edge))
    }
}

#[async_trait]
impl WhitelistStore for RocksDbStore {
    async fn read_nodes(&self) -> Result<Vec<NodeId>, StoreError> {
        self.scan(CF_WHITELIST, |key, _| decode_u64(key).map(NodeId))
    }

    async fn insert_node(&self, node: NodeId) -> Result<(), StoreError> {
        self.put(CF_WHITELIST, &node_key(node), &[])
    }

    async fn delete_node(&self, node: NodeId) -> Result<(), StoreError> {
        self.delete(CF_WHITELIST, &node_key(node))
    }
}

#[async_trait]
impl SettingsStore for RocksDbStore {
    async fn read_all(&self) -> Result<Vec<NodeSettings>, StoreError> {
        self.scan(CF_SETTINGS, |_, value| {
            serde_json::from_slice(value)
                .map_err(|e| StoreError::Query(format!("Malformed settings row: {}", e)))
        })
    }

    async fn upsert(&self, settings: NodeSettings) -> Result<(), StoreError> {
        let value = serde_json::to_vec(&settings)
            .map_err(|e| StoreError::Query(format!("Cannot encode settings: {}", e)))?;
        self.put(CF_SETTINGS, &node_key(settings.node), &value)
    }
}
