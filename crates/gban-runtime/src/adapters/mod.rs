//! # Adapters
//!
//! Runtime-owned implementations of subsystem ports.

pub mod error_channel;
pub mod settings_directory;
pub mod storage;

pub use error_channel::{render_error, truncate_lines, ErrorChannel, MAX_MESSAGE_LENGTH};
pub use settings_directory::SettingsDirectory;
