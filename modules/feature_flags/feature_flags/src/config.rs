//! Configuration for the feature flags module.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Feature flags module configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureFlagsConfig {
    /// How long an update waits for the guild lock before giving up.
    #[serde(with = "humantime_serde")]
    pub lock_wait: Duration,

    /// Expiry of the guild lock, so a crashed holder cannot block forever.
    #[serde(with = "humantime_serde")]
    pub lock_ttl: Duration,

    /// First backoff between lock attempts.
    #[serde(with = "humantime_serde")]
    pub lock_retry_initial: Duration,

    /// Upper bound for the exponential lock backoff.
    #[serde(with = "humantime_serde")]
    pub lock_retry_max: Duration,

    /// Drop the guild's cache entry once an update has touched the store.
    ///
    /// When disabled, this process keeps serving the flags it cached
    /// before the update until restart.
    pub invalidate_cache_after_reconcile: bool,
}

impl Default for FeatureFlagsConfig {
    fn default() -> Self {
        Self {
            lock_wait: Duration::from_secs(60),
            lock_ttl: Duration::from_secs(60),
            lock_retry_initial: Duration::from_millis(10),
            lock_retry_max: Duration::from_secs(1),
            invalidate_cache_after_reconcile: true,
        }
    }
}
