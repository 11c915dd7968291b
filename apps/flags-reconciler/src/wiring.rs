use std::collections::BTreeSet;
use std::sync::Arc;

use feature_flags::domain::{StaticPluginRegistry, keys};
use feature_flags::{FeatureFlagsBackends, FeatureFlagsModule, GuildId};
use inmemory_store_plugin::InMemoryStore;
use static_flags_plugin::StaticFlagsPlugin;

use crate::config::AppConfig;

/// Builds the module over an in-memory backend and the configured plugins.
pub fn build(cfg: &AppConfig) -> FeatureFlagsModule {
    let store = Arc::new(InMemoryStore::new());
    for guild in &cfg.store.seed {
        store.seed(&keys::guild_flags(guild.id), guild.active.iter().cloned());
    }

    let registry = Arc::new(StaticPluginRegistry::new());
    for plugin_cfg in &cfg.plugins {
        registry.register(Arc::new(StaticFlagsPlugin::from_config(plugin_cfg)));
    }
    tracing::info!(
        plugins = registry.len(),
        seeded_guilds = cfg.store.seed.len(),
        "Backends ready"
    );

    FeatureFlagsModule::init(
        &cfg.feature_flags,
        FeatureFlagsBackends {
            store: store.clone(),
            lock: store,
            registry,
        },
    )
}

/// Every guild mentioned by a plugin or the seed, ascending.
pub fn known_guilds(cfg: &AppConfig) -> Vec<GuildId> {
    let mut ids: BTreeSet<GuildId> = cfg.store.seed.iter().map(|g| g.id).collect();
    for plugin in &cfg.plugins {
        ids.extend(plugin.guilds.iter().map(|g| g.id));
    }
    ids.into_iter().collect()
}
