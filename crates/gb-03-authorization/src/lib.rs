//! # GB-03 Authorization Resolver
//!
//! Decides whether an operator may invoke a logical command on a node,
//! evaluating the node's permission overrides for that command.
//!
//! **Subsystem ID:** 3  
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Precedence
//!
//! Earlier steps short-circuit later ones:
//!
//! | Step | Rule | Result |
//! |------|------|--------|
//! | 1 | Baseline `UseApplicationCommands` missing | deny |
//! | 2 | Exact-channel (else all-channels) override disabled | deny |
//! | 3 | User override for the operator | its value |
//! | 4 | Role overrides for held roles: any enabled / any disabled / everyone | allow / deny / its value |
//! | 5 | User or role overrides exist, none applied | deny |
//! | 6 | Default permission held (no default: allow) | its value |
//!
//! Overrides are fetched from the platform on every check and never cached:
//! fallback controls are clicked arbitrarily later than they are posted.
//!
//! ## Module Structure
//!
//! ```text
//! gb-03-authorization/
//! ├── domain/          # CommandId, PermissionOverride, Decision, errors
//! ├── algorithms/      # evaluate(): the pure precedence function
//! ├── ports/           # AuthorizationApi (inbound), PermissionSource (outbound)
//! └── service.rs       # AuthorizationResolver
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use algorithms::evaluate;
pub use domain::{
    AuthorizationError, AuthorizationSnapshot, CommandId, Decision, OverrideTarget,
    PermissionOverride,
};
pub use ports::{AuthorizationApi, PermissionSource, StaticPermissionSource};
pub use service::AuthorizationResolver;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
