//! # Runtime Configuration
//!
//! Unified configuration for the bot, propagation and storage, read from
//! environment variables.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MAIN_NODE_ID` | required | Main server; always whitelisted, hosts the error channel |
//! | `MAIN_ERROR_CHANNEL` | unset | Channel on the main server receiving error reports |
//! | `COMMAND_TEST_MODE` | `false` | Register commands on the main server only |
//! | `GB_HANDLER_TIMEOUT_SECS` | `30` | Per-node handler budget |
//! | `GB_STORAGE` | `memory` | `memory` or `rocksdb` |
//! | `GB_DATA_DIR` | `./data/gban` | RocksDB directory |

use gb_04_propagation::PropagationConfig;
use shared_types::{ChannelId, NodeId};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Bot identity configuration.
    pub bot: BotConfig,
    /// Propagation configuration.
    pub propagation: PropagationConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} environment variable missing")]
    MissingVar(&'static str),

    /// A variable is not a valid number.
    #[error("Invalid numeric value '{value}' for {var}")]
    InvalidNumber {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// A variable is not one of `0`, `1`, `true`, `false`.
    #[error("Invalid boolean value '{value}' for {var}")]
    InvalidBool {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// Unknown storage backend.
    #[error("Unknown storage backend '{0}' (expected 'memory' or 'rocksdb')")]
    UnknownBackend(String),

    /// The main node id is zero.
    #[error("MAIN_NODE_ID must be a non-zero server id")]
    ZeroMainNode,

    /// The handler timeout is zero.
    #[error("GB_HANDLER_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,

    /// RocksDB storage requested from a build without it.
    #[error("GB_STORAGE=rocksdb requires the 'rocksdb' feature")]
    RocksDbUnavailable,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotConfig {
    /// Main node. Always whitelisted; hosts the error channel.
    pub main_node_id: NodeId,
    /// Error channel on the main node.
    pub error_channel: Option<ChannelId>,
    /// Register commands on the main node only.
    pub command_test_mode: bool,
}

/// Storage backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local stores; nothing survives a restart.
    #[default]
    Memory,
    /// RocksDB database at `path`.
    RocksDb {
        /// Database directory.
        path: PathBuf,
    },
}

/// Storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// Selected backend.
    pub backend: StorageBackend,
}

/// Strict boolean parser: `0`, `1`, `true`, `false` (case-insensitive).
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "0" | "false" => Some(false),
        "1" | "true" => Some(true),
        _ => None,
    }
}

fn parse_u64(var: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, value })
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let main_node_id = lookup("MAIN_NODE_ID")
            .ok_or(ConfigError::MissingVar("MAIN_NODE_ID"))
            .and_then(|v| parse_u64("MAIN_NODE_ID", v))?;

        let error_channel = lookup("MAIN_ERROR_CHANNEL")
            .map(|v| parse_u64("MAIN_ERROR_CHANNEL", v))
            .transpose()?
            .map(ChannelId);

        let command_test_mode = match lookup("COMMAND_TEST_MODE") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidBool {
                var: "COMMAND_TEST_MODE",
                value,
            })?,
            None => false,
        };

        let mut propagation = PropagationConfig::default();
        if let Some(value) = lookup("GB_HANDLER_TIMEOUT_SECS") {
            propagation.handler_timeout =
                Duration::from_secs(parse_u64("GB_HANDLER_TIMEOUT_SECS", value)?);
        }

        let backend = match lookup("GB_STORAGE").as_deref() {
            None | Some("memory") => StorageBackend::Memory,
            Some("rocksdb") => StorageBackend::RocksDb {
                path: lookup("GB_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("./data/gban")),
            },
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        Ok(Self {
            bot: BotConfig {
                main_node_id: NodeId(main_node_id),
                error_channel,
                command_test_mode,
            },
            propagation,
            storage: StorageConfig { backend },
        })
    }

    /// Reject configurations the runtime cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.main_node_id == NodeId(0) {
            return Err(ConfigError::ZeroMainNode);
        }
        if self.propagation.handler_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if matches!(self.storage.backend, StorageBackend::RocksDb { .. })
            && !cfg!(feature = "rocksdb")
        {
            return Err(ConfigError::RocksDbUnavailable);
        }
        Ok(())
    }
}
