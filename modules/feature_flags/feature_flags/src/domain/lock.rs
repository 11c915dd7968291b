//! Blocking acquisition of guild-scoped distributed locks.
//!
//! Acquisition polls [`DistributedLock::try_acquire`] with exponential
//! backoff and jitter until the wait bound elapses. The returned
//! [`LockGuard`] must be released explicitly; a guard dropped without
//! release (cancelled future, panic) spawns a best-effort release and
//! otherwise relies on the lock TTL.

use std::sync::Arc;
use std::time::Duration;

use feature_flags_sdk::DistributedLock;
use rand::Rng;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::DomainError;
use crate::config::FeatureFlagsConfig;

/// Timing of lock acquisition.
#[derive(Debug, Clone, Copy)]
pub struct LockSettings {
    pub wait: Duration,
    pub ttl: Duration,
    pub retry_initial: Duration,
    pub retry_max: Duration,
}

impl From<&FeatureFlagsConfig> for LockSettings {
    fn from(cfg: &FeatureFlagsConfig) -> Self {
        Self {
            wait: cfg.lock_wait,
            ttl: cfg.lock_ttl,
            retry_initial: cfg.lock_retry_initial,
            retry_max: cfg.lock_retry_max,
        }
    }
}

/// Acquires locks from a [`DistributedLock`] backend with a bounded wait.
pub struct GuildLocker {
    backend: Arc<dyn DistributedLock>,
    settings: LockSettings,
}

impl GuildLocker {
    #[must_use]
    pub fn new(backend: Arc<dyn DistributedLock>, settings: LockSettings) -> Self {
        Self { backend, settings }
    }

    /// Blocks until `key` is acquired or the wait bound elapses.
    ///
    /// # Errors
    ///
    /// - `LockTimeout` if the lock stayed held for the whole wait bound.
    /// - `LockBackend` if the backend failed.
    pub async fn acquire(&self, key: &str) -> Result<LockGuard, DomainError> {
        let owner = Uuid::new_v4().to_string();
        let started = Instant::now();
        let deadline = far_bounded(started, self.settings.wait);
        let mut backoff = self.settings.retry_initial;

        loop {
            let acquired = self
                .backend
                .try_acquire(key, &owner, self.settings.ttl)
                .await
                .map_err(|source| DomainError::LockBackend {
                    key: key.to_owned(),
                    source,
                })?;

            if acquired {
                debug!(key, owner = %owner, ttl_ms = self.settings.ttl.as_millis(), "lock acquired");
                return Ok(LockGuard {
                    backend: Arc::clone(&self.backend),
                    key: key.to_owned(),
                    owner,
                    released: false,
                });
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(DomainError::LockTimeout {
                    key: key.to_owned(),
                    waited: now.duration_since(started),
                });
            }

            let sleep = backoff
                .saturating_add(jitter(backoff))
                .min(deadline.saturating_duration_since(now));
            debug!(key, backoff_ms = sleep.as_millis(), "lock held, backing off");
            tokio::time::sleep(sleep).await;

            backoff = backoff.saturating_mul(2).min(self.settings.retry_max);
        }
    }
}

/// Upper bound for deadlines; larger waits are treated as unbounded.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// `start + wait`, capped at [`FAR_FUTURE`] from `start`.
fn far_bounded(start: Instant, wait: Duration) -> Instant {
    start
        .checked_add(wait.min(FAR_FUTURE))
        .unwrap_or(start)
}

/// Up to half of `backoff`, so contending processes spread out.
fn jitter(backoff: Duration) -> Duration {
    let max_ms = u64::try_from((backoff / 2).as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(rand::rng().random_range(0..=max_ms))
}

/// A held guild lock.
pub struct LockGuard {
    backend: Arc<dyn DistributedLock>,
    key: String,
    owner: String,
    released: bool,
}

impl LockGuard {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Releases the lock.
    ///
    /// Failures are logged, not returned: the lock expires via its TTL.
    pub async fn release(mut self) {
        self.released = true;
        match self.backend.release(&self.key, &self.owner).await {
            Ok(true) => debug!(key = %self.key, "lock released"),
            Ok(false) => warn!(
                key = %self.key,
                "lock release found the lock expired or taken over"
            ),
            Err(e) => warn!(
                key = %self.key,
                error = %e,
                "lock release failed, will expire via TTL"
            ),
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(key = %self.key, "lock guard dropped outside a runtime, will expire via TTL");
            return;
        };

        let backend = Arc::clone(&self.backend);
        let key = std::mem::take(&mut self.key);
        let owner = std::mem::take(&mut self.owner);
        handle.spawn(async move {
            match backend.release(&key, &owner).await {
                Ok(_) => debug!(key = %key, "lock released on drop"),
                Err(e) => debug!(key = %key, error = %e, "lock release on drop failed"),
            }
        });
    }
}
