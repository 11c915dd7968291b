use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use feature_flags_sdk::{DistributedLock, FeatureFlagsError};
use tokio::time::Instant;

use crate::store::InMemoryStore;

/// Expiry cap; longer TTLs are treated as never expiring.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug)]
struct Held {
    owner: String,
    expires_at: Instant,
}

/// Lock entries keyed by lock name. Expired entries are treated as free.
#[derive(Debug, Default)]
pub struct LockTable {
    held: HashMap<String, Held>,
}

impl LockTable {
    fn live(&self, key: &str, now: Instant) -> Option<&Held> {
        self.held.get(key).filter(|h| h.expires_at > now)
    }
}

impl InMemoryStore {
    /// Returns `true` if an unexpired lock is held at `key`.
    #[must_use]
    pub fn is_locked(&self, key: &str) -> bool {
        self.locks.lock().live(key, Instant::now()).is_some()
    }
}

#[async_trait]
impl DistributedLock for InMemoryStore {
    async fn try_acquire(
        &self,
        key: &str,
        owner: &str,
        ttl: Duration,
    ) -> Result<bool, FeatureFlagsError> {
        let now = Instant::now();
        let mut table = self.locks.lock();
        if let Some(held) = table.live(key, now) {
            tracing::trace!(key, holder = %held.owner, "Lock busy");
            return Ok(false);
        }
        table.held.insert(
            key.to_owned(),
            Held {
                owner: owner.to_owned(),
                expires_at: now.checked_add(ttl.min(MAX_TTL)).unwrap_or(now),
            },
        );
        Ok(true)
    }

    async fn release(&self, key: &str, owner: &str) -> Result<bool, FeatureFlagsError> {
        let now = Instant::now();
        let mut table = self.locks.lock();
        let ours = table.live(key, now).is_some_and(|h| h.owner == owner);
        if ours {
            table.held.remove(key);
        }
        Ok(ours)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn second_owner_is_refused_while_held() {
        let store = InMemoryStore::new();
        assert!(store.try_acquire("l", "a", TTL).await.unwrap());
        assert!(!store.try_acquire("l", "b", TTL).await.unwrap());
        assert!(store.is_locked("l"));
    }

    #[tokio::test]
    async fn release_frees_the_lock() {
        let store = InMemoryStore::new();
        assert!(store.try_acquire("l", "a", TTL).await.unwrap());
        assert!(store.release("l", "a").await.unwrap());
        assert!(!store.is_locked("l"));
        assert!(store.try_acquire("l", "b", TTL).await.unwrap());
    }

    #[tokio::test]
    async fn foreign_release_is_ignored() {
        let store = InMemoryStore::new();
        assert!(store.try_acquire("l", "a", TTL).await.unwrap());
        assert!(!store.release("l", "b").await.unwrap());
        assert!(store.is_locked("l"));
    }

    #[tokio::test(start_paused = true)]
    async fn huge_ttl_is_capped() {
        let store = InMemoryStore::new();
        assert!(store.try_acquire("l", "a", Duration::MAX).await.unwrap());

        tokio::time::advance(Duration::from_secs(365 * 24 * 60 * 60)).await;

        assert!(store.is_locked("l"));
        assert!(!store.try_acquire("l", "b", TTL).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_lock_can_be_taken() {
        let store = InMemoryStore::new();
        assert!(store.try_acquire("l", "a", Duration::from_secs(1)).await.unwrap());

        tokio::time::advance(Duration::from_secs(2)).await;

        assert!(!store.is_locked("l"));
        assert!(store.try_acquire("l", "b", TTL).await.unwrap());
        assert!(!store.release("l", "a").await.unwrap());
        assert!(store.is_locked("l"));
    }
}
