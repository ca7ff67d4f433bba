//! # Configuration
//!
//! Tunables of the Propagation Protocol and the logical commands whose
//! overrides gate fallback controls.

use shared_types::Permission;
use std::time::Duration;

/// Command whose overrides gate "apply ban" controls.
pub const GBAN_COMMAND: &str = "gban";

/// Command whose overrides gate trust-list changes.
pub const TRUSTED_COMMAND: &str = "trusted";

/// Default permission of [`GBAN_COMMAND`].
pub const GBAN_COMMAND_PERMISSION: Permission = Permission::BanMembers;

/// Default permission of [`TRUSTED_COMMAND`].
pub const TRUSTED_COMMAND_PERMISSION: Permission = Permission::ManageServer;

/// Default per-node handler budget.
pub const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(30);

/// Propagation configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropagationConfig {
    /// Budget for one per-node handler. Expiry counts as `ErrorFailure`.
    pub handler_timeout: Duration,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            handler_timeout: DEFAULT_HANDLER_TIMEOUT,
        }
    }
}
