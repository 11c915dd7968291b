use std::collections::HashMap;

use async_trait::async_trait;
use feature_flags_sdk::{FeatureFlagsError, FlagName, FlagProvider, GuildId, Plugin};
use parking_lot::RwLock;

use crate::config::StaticFlagsPluginConfig;

/// Flag provider backed by an in-memory table.
pub struct StaticFlagsPlugin {
    sys_name: String,
    universe: Vec<FlagName>,
    active: RwLock<HashMap<GuildId, Vec<FlagName>>>,
}

impl StaticFlagsPlugin {
    #[must_use]
    pub fn new(sys_name: impl Into<String>, universe: Vec<FlagName>) -> Self {
        Self {
            sys_name: sys_name.into(),
            universe,
            active: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn from_config(cfg: &StaticFlagsPluginConfig) -> Self {
        let plugin = Self::new(cfg.sys_name.clone(), cfg.flags.clone());
        {
            let mut active = plugin.active.write();
            for guild in &cfg.guilds {
                active.insert(guild.id, guild.active.clone());
            }
        }
        tracing::debug!(
            plugin = %plugin.sys_name,
            flags = plugin.universe.len(),
            guilds = cfg.guilds.len(),
            "Static flags plugin configured"
        );
        plugin
    }

    /// Replaces the guild's active flags. Takes effect on the next reconciliation.
    pub fn set_guild_flags<I, S>(&self, guild_id: GuildId, flags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<FlagName>,
    {
        let flags = flags.into_iter().map(Into::into).collect();
        self.active.write().insert(guild_id, flags);
    }
}

impl Plugin for StaticFlagsPlugin {
    fn sys_name(&self) -> &str {
        &self.sys_name
    }

    fn as_flag_provider(&self) -> Option<&dyn FlagProvider> {
        Some(self)
    }
}

#[async_trait]
impl FlagProvider for StaticFlagsPlugin {
    fn all_feature_flags(&self) -> Vec<FlagName> {
        self.universe.clone()
    }

    async fn update_feature_flags(
        &self,
        guild_id: GuildId,
    ) -> Result<Vec<FlagName>, FeatureFlagsError> {
        Ok(self
            .active
            .read()
            .get(&guild_id)
            .cloned()
            .unwrap_or_default())
    }
}
