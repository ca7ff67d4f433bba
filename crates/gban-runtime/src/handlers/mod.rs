//! # Handlers
//!
//! Entry points driven by chat platform events: operator commands,
//! fallback control clicks, the bot joining a server and bot startup.

pub mod commands;
pub mod node_join;

pub use commands::{
    CommandContext, CommandHandler, INVALID_NODE_ID_REPLY, MAIN_NODE_ONLY_REPLY,
    NOT_WHITELISTED_REPLY,
};
pub use node_join::NodeJoinHandler;
