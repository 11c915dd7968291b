//! Shared fakes and wiring for feature flags integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use feature_flags::domain::StaticPluginRegistry;
use feature_flags::{
    FeatureFlagsBackends, FeatureFlagsConfig, FeatureFlagsError, FeatureFlagsModule, FlagName,
    FlagProvider, FlagSet, GuildId, KeyValueStore, Plugin,
};
use inmemory_store_plugin::InMemoryStore;
use parking_lot::Mutex;

pub fn names(items: &[&str]) -> Vec<FlagName> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

pub fn set(items: &[&str]) -> FlagSet {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// Config with short lock timings so contention tests stay fast.
pub fn fast_config() -> FeatureFlagsConfig {
    FeatureFlagsConfig {
        lock_wait: Duration::from_secs(5),
        lock_retry_initial: Duration::from_millis(5),
        lock_retry_max: Duration::from_millis(20),
        ..FeatureFlagsConfig::default()
    }
}

pub fn build(
    cfg: &FeatureFlagsConfig,
    store: Arc<dyn KeyValueStore>,
    lock: Arc<InMemoryStore>,
    plugins: Vec<Arc<dyn Plugin>>,
) -> FeatureFlagsModule {
    let registry = Arc::new(StaticPluginRegistry::new());
    for plugin in plugins {
        registry.register(plugin);
    }
    FeatureFlagsModule::init(
        cfg,
        FeatureFlagsBackends {
            store,
            lock,
            registry,
        },
    )
}

/// Module over a single in-memory store used for both data and locks.
pub fn build_inmemory(
    cfg: &FeatureFlagsConfig,
    plugins: Vec<Arc<dyn Plugin>>,
) -> (FeatureFlagsModule, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let module = build(cfg, store.clone(), store.clone(), plugins);
    (module, store)
}

/// Flag provider with scripted answers, call counting and optional delay.
pub struct FakeProvider {
    name: String,
    universe: Vec<FlagName>,
    active: Mutex<Vec<FlagName>>,
    fail: AtomicBool,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl FakeProvider {
    pub fn new(name: &str, universe: &[&str], active: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            universe: names(universe),
            active: Mutex::new(names(active)),
            fail: AtomicBool::new(false),
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(name: &str, universe: &[&str]) -> Self {
        let p = Self::new(name, universe, &[]);
        p.fail.store(true, Ordering::SeqCst);
        p
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_active(&self, active: &[&str]) {
        *self.active.lock() = names(active);
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Plugin for FakeProvider {
    fn sys_name(&self) -> &str {
        &self.name
    }

    fn as_flag_provider(&self) -> Option<&dyn FlagProvider> {
        Some(self)
    }
}

#[async_trait]
impl FlagProvider for FakeProvider {
    fn all_feature_flags(&self) -> Vec<FlagName> {
        self.universe.clone()
    }

    async fn update_feature_flags(
        &self,
        _guild_id: GuildId,
    ) -> Result<Vec<FlagName>, FeatureFlagsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(FeatureFlagsError::provider(&self.name, "upstream unavailable"));
        }
        Ok(self.active.lock().clone())
    }
}

/// Plugin without a flag provider capability.
pub struct PlainPlugin(pub &'static str);

impl Plugin for PlainPlugin {
    fn sys_name(&self) -> &str {
        self.0
    }
}

/// Store wrapper whose writes can be switched to fail.
pub struct FlakyStore {
    pub inner: Arc<InMemoryStore>,
    pub fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            fail_writes: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn members(&self, key: &str) -> Result<FlagSet, FeatureFlagsError> {
        self.inner.members(key).await
    }

    async fn add_members(&self, key: &str, members: &[FlagName]) -> Result<(), FeatureFlagsError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FeatureFlagsError::store("connection reset"));
        }
        self.inner.add_members(key, members).await
    }

    async fn remove_members(
        &self,
        key: &str,
        members: &[FlagName],
    ) -> Result<(), FeatureFlagsError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FeatureFlagsError::store("connection reset"));
        }
        self.inner.remove_members(key, members).await
    }
}
