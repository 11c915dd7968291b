//! Wiring of the feature flags module.

use std::sync::Arc;

use feature_flags_sdk::{DistributedLock, FeatureFlagsClient, KeyValueStore, PluginRegistry};
use tracing::info;

use crate::config::FeatureFlagsConfig;
use crate::domain::{
    FeatureFlagsLocalClient, FlagCache, GuildLocker, LockSettings, Reconciler, Service,
};

/// External collaborators the module runs against.
#[derive(Clone)]
pub struct FeatureFlagsBackends {
    pub store: Arc<dyn KeyValueStore>,
    pub lock: Arc<dyn DistributedLock>,
    pub registry: Arc<dyn PluginRegistry>,
}

/// The feature flags module: one per process, built once at startup.
pub struct FeatureFlagsModule {
    service: Arc<Service>,
    client: Arc<dyn FeatureFlagsClient>,
}

impl FeatureFlagsModule {
    #[must_use]
    pub fn init(cfg: &FeatureFlagsConfig, backends: FeatureFlagsBackends) -> Self {
        info!(
            lock_wait_ms = cfg.lock_wait.as_millis(),
            lock_ttl_ms = cfg.lock_ttl.as_millis(),
            invalidate_cache_after_reconcile = cfg.invalidate_cache_after_reconcile,
            "Initializing feature_flags"
        );

        let cache = Arc::new(FlagCache::new(Arc::clone(&backends.store)));
        let locker = GuildLocker::new(backends.lock, LockSettings::from(cfg));
        let reconciler = Reconciler::new(backends.store, backends.registry, locker);
        let service = Arc::new(Service::new(
            cache,
            reconciler,
            cfg.invalidate_cache_after_reconcile,
        ));
        let client: Arc<dyn FeatureFlagsClient> =
            Arc::new(FeatureFlagsLocalClient::new(Arc::clone(&service)));

        Self { service, client }
    }

    /// Public client for consumers.
    #[must_use]
    pub fn client(&self) -> Arc<dyn FeatureFlagsClient> {
        Arc::clone(&self.client)
    }

    /// Domain service, for callers that want per-plugin reports.
    #[must_use]
    pub fn service(&self) -> Arc<Service> {
        Arc::clone(&self.service)
    }
}
