//! Local (in-process) client for the feature flags module.

use std::sync::Arc;

use async_trait::async_trait;
use feature_flags_sdk::{FeatureFlagsClient, FeatureFlagsError, FlagSet, GuildId};

use super::{DomainError, Service};

/// Local client wrapping the domain service.
pub struct FeatureFlagsLocalClient {
    svc: Arc<Service>,
}

impl FeatureFlagsLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

#[async_trait]
impl FeatureFlagsClient for FeatureFlagsLocalClient {
    async fn get_guild_flags(&self, guild_id: GuildId) -> Result<FlagSet, FeatureFlagsError> {
        self.svc
            .get_guild_flags(guild_id)
            .await
            .map(|flags| FlagSet::clone(&flags))
            .map_err(|e: DomainError| {
                tracing::error!(operation = "get_guild_flags", guild_id, error = ?e, "feature_flags call failed");
                e.into()
            })
    }

    async fn guild_has_flag(
        &self,
        guild_id: GuildId,
        flag: &str,
    ) -> Result<bool, FeatureFlagsError> {
        self.svc
            .guild_has_flag(guild_id, flag)
            .await
            .map_err(|e: DomainError| {
                tracing::error!(operation = "guild_has_flag", guild_id, flag, error = ?e, "feature_flags call failed");
                e.into()
            })
    }

    async fn update_guild_flags(&self, guild_id: GuildId) -> Result<(), FeatureFlagsError> {
        self.svc
            .update_guild_flags(guild_id)
            .await
            .map_err(|e: DomainError| {
                tracing::error!(operation = "update_guild_flags", guild_id, error = ?e, "feature_flags call failed");
                e.into()
            })
    }
}
