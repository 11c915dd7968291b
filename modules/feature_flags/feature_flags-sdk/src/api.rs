//! Public API trait for the feature flags module.

use async_trait::async_trait;

use crate::error::FeatureFlagsError;
use crate::models::{FlagSet, GuildId};

/// Public API of the feature flags module.
///
/// Reads are served from a process-local cache that is filled from the
/// key-value store on first access. Updates recompute the guild's flags
/// from every loaded [`FlagProvider`](crate::FlagProvider) under a
/// guild-scoped distributed lock.
#[async_trait]
pub trait FeatureFlagsClient: Send + Sync {
    /// Returns the flags the guild currently has.
    ///
    /// # Errors
    ///
    /// - `Store` if the cache had no entry and the store read failed.
    ///   Nothing is cached in that case, the next call retries.
    async fn get_guild_flags(&self, guild_id: GuildId) -> Result<FlagSet, FeatureFlagsError>;

    /// Returns `true` if the guild has `flag`.
    ///
    /// # Errors
    ///
    /// Same as [`get_guild_flags`](Self::get_guild_flags).
    async fn guild_has_flag(&self, guild_id: GuildId, flag: &str)
    -> Result<bool, FeatureFlagsError>;

    /// Recomputes and persists the guild's flags across all flag providers.
    ///
    /// A failing plugin does not stop the others from being reconciled.
    ///
    /// # Errors
    ///
    /// - `LockTimeout` / `Lock` if the guild lock could not be acquired;
    ///   no plugin was queried in that case.
    /// - Otherwise the most recent plugin or store failure of this run.
    async fn update_guild_flags(&self, guild_id: GuildId) -> Result<(), FeatureFlagsError>;
}
