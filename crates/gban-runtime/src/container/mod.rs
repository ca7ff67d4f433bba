//! # Service Container
//!
//! Configuration and explicit construction of every subsystem.
//!
//! - Subsystems are built once, in dependency order
//! - Storage backends are chosen by configuration
//! - The operational error channel owns the shutdown signal

pub mod config;
pub mod services;

pub use config::{
    parse_bool, BotConfig, ConfigError, RuntimeConfig, StorageBackend, StorageConfig,
};
pub use services::{ContainerError, ServiceContainer, Stores};
