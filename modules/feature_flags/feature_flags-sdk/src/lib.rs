//! Feature Flags SDK
//!
//! This crate provides the public contracts of the `feature_flags` module:
//!
//! - [`FeatureFlagsClient`] - public API trait for consumers
//! - [`Plugin`], [`FlagProvider`], [`PluginRegistry`] - plugin-side traits
//! - [`KeyValueStore`], [`DistributedLock`] - backend traits
//! - [`GuildId`], [`FlagSet`], [`FlagDiff`] - domain models
//! - [`FeatureFlagsError`] - error type shared by all of the above
//!
//! ## Usage
//!
//! ```ignore
//! use feature_flags_sdk::FeatureFlagsClient;
//!
//! let flags = client.get_guild_flags(guild_id).await?;
//! if client.guild_has_flag(guild_id, "premium").await? {
//!     // ...
//! }
//!
//! // Recompute the guild's flags from every loaded flag provider.
//! client.update_guild_flags(guild_id).await?;
//! ```

pub mod api;
pub mod backend_api;
pub mod error;
pub mod models;
pub mod plugin_api;

pub use api::FeatureFlagsClient;
pub use backend_api::{DistributedLock, KeyValueStore};
pub use error::FeatureFlagsError;
pub use models::{FlagDiff, FlagName, FlagSet, GuildId};
pub use plugin_api::{FlagProvider, Plugin, PluginRegistry};
