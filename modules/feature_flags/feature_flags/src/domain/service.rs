//! Domain service for the feature flags module.

use std::sync::Arc;

use feature_flags_sdk::{FlagSet, GuildId};
use tracing::debug;

use super::cache::FlagCache;
use super::error::DomainError;
use super::reconcile::{ReconcileReport, Reconciler};

/// Feature flags service: cached reads plus guild reconciliation.
pub struct Service {
    cache: Arc<FlagCache>,
    reconciler: Reconciler,
    invalidate_after_reconcile: bool,
}

impl Service {
    #[must_use]
    pub fn new(
        cache: Arc<FlagCache>,
        reconciler: Reconciler,
        invalidate_after_reconcile: bool,
    ) -> Self {
        Self {
            cache,
            reconciler,
            invalidate_after_reconcile,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &FlagCache {
        &self.cache
    }

    /// Returns the guild's flags.
    ///
    /// # Errors
    ///
    /// `StoreRead` if the cache missed and the store read failed.
    pub async fn get_guild_flags(&self, guild_id: GuildId) -> Result<Arc<FlagSet>, DomainError> {
        self.cache.get_flags(guild_id).await
    }

    /// Returns `true` if the guild has `flag`.
    ///
    /// # Errors
    ///
    /// `StoreRead` if the cache missed and the store read failed.
    pub async fn guild_has_flag(&self, guild_id: GuildId, flag: &str) -> Result<bool, DomainError> {
        self.cache.has_flag(guild_id, flag).await
    }

    /// Reconciles the guild and reports per-plugin outcomes.
    ///
    /// Once the lock was held the store may have changed, so the guild's
    /// cache entry is dropped (if configured) even when a plugin failed.
    ///
    /// # Errors
    ///
    /// Lock failures only; plugin and store failures are in the report.
    #[tracing::instrument(skip_all, fields(guild_id = guild_id))]
    pub async fn reconcile_guild(&self, guild_id: GuildId) -> Result<ReconcileReport, DomainError> {
        let report = self.reconciler.reconcile(guild_id).await?;

        if self.invalidate_after_reconcile && self.cache.invalidate(guild_id).await {
            debug!("Dropped cached flags after reconciliation");
        }

        Ok(report)
    }

    /// Reconciles the guild.
    ///
    /// # Errors
    ///
    /// Lock failures, otherwise the last plugin or store failure of the run.
    pub async fn update_guild_flags(&self, guild_id: GuildId) -> Result<(), DomainError> {
        self.reconcile_guild(guild_id).await?.into_result()
    }
}
