//! Static flag provider plugin.
//!
//! Declares a fixed universe of flags and serves each guild's active
//! flags from configuration. Guilds without an entry have no active
//! flags. Active lists can be replaced at runtime.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
mod plugin;

pub use config::{GuildFlagsConfig, StaticFlagsPluginConfig};
pub use plugin::StaticFlagsPlugin;
