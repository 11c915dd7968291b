//! Process-local read-through cache of guild flag sets.
//!
//! Hits take the shared lock only. A miss takes the exclusive lock,
//! re-checks the map (another caller may have filled it in between) and
//! only then reads the store, so concurrent misses for the same guild
//! cost one store round-trip. Failed fills leave no entry behind.

use std::collections::HashMap;
use std::sync::Arc;

use feature_flags_sdk::{FlagSet, GuildId, KeyValueStore};
use tokio::sync::RwLock;
use tracing::debug;

use super::error::DomainError;
use super::keys;

/// Guild id -> last known flag set.
pub struct FlagCache {
    store: Arc<dyn KeyValueStore>,
    entries: RwLock<HashMap<GuildId, Arc<FlagSet>>>,
}

impl FlagCache {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the guild's flags, reading through to the store on a miss.
    ///
    /// # Errors
    ///
    /// `StoreRead` if the store read fails. The cache is left unchanged.
    pub async fn get_flags(&self, guild_id: GuildId) -> Result<Arc<FlagSet>, DomainError> {
        {
            let entries = self.entries.read().await;
            if let Some(flags) = entries.get(&guild_id) {
                return Ok(Arc::clone(flags));
            }
        }

        let mut entries = self.entries.write().await;
        if let Some(flags) = entries.get(&guild_id) {
            return Ok(Arc::clone(flags));
        }

        let flags = self
            .store
            .members(&keys::guild_flags(guild_id))
            .await
            .map_err(|source| DomainError::StoreRead { guild_id, source })?;
        debug!(guild_id, flag_count = flags.len(), "Filled flag cache from store");

        let flags = Arc::new(flags);
        entries.insert(guild_id, Arc::clone(&flags));
        Ok(flags)
    }

    /// Returns `true` if the guild has `flag`.
    ///
    /// # Errors
    ///
    /// Same as [`get_flags`](Self::get_flags).
    pub async fn has_flag(&self, guild_id: GuildId, flag: &str) -> Result<bool, DomainError> {
        Ok(self.get_flags(guild_id).await?.contains(flag))
    }

    /// Drops the guild's entry so the next read refills it from the store.
    ///
    /// Returns `true` if an entry was present.
    pub async fn invalidate(&self, guild_id: GuildId) -> bool {
        self.entries.write().await.remove(&guild_id).is_some()
    }

    /// Number of cached guilds.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
