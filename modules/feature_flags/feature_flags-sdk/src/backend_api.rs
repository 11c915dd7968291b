//! Backend traits consumed by the feature flags core.
//!
//! Implementations live in backend plugins (see `inmemory_store_plugin`).

use std::time::Duration;

use async_trait::async_trait;

use crate::error::FeatureFlagsError;
use crate::models::{FlagDiff, FlagName, FlagSet};

/// Key-value store holding one set of strings per key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns all members of the set at `key` (empty if the key is absent).
    ///
    /// # Errors
    ///
    /// `Store` on connectivity or command failure.
    async fn members(&self, key: &str) -> Result<FlagSet, FeatureFlagsError>;

    /// Adds `members` to the set at `key`.
    ///
    /// # Errors
    ///
    /// `Store` on connectivity or command failure.
    async fn add_members(&self, key: &str, members: &[FlagName]) -> Result<(), FeatureFlagsError>;

    /// Removes `members` from the set at `key`.
    ///
    /// # Errors
    ///
    /// `Store` on connectivity or command failure.
    async fn remove_members(
        &self,
        key: &str,
        members: &[FlagName],
    ) -> Result<(), FeatureFlagsError>;

    /// Applies `diff` to the set at `key`: additions first, then removals.
    ///
    /// Empty halves are skipped. Backends that can pipeline both commands
    /// over one connection should override this.
    ///
    /// # Errors
    ///
    /// `Store` if either command fails. If the add fails the remove is not sent.
    async fn apply_diff(&self, key: &str, diff: &FlagDiff) -> Result<(), FeatureFlagsError> {
        if !diff.add.is_empty() {
            self.add_members(key, &diff.add).await?;
        }
        if !diff.remove.is_empty() {
            self.remove_members(key, &diff.remove).await?;
        }
        Ok(())
    }
}

/// Named, TTL-bound mutual exclusion shared between processes.
#[async_trait]
pub trait DistributedLock: Send + Sync {
    /// Tries once to take the lock at `key` for `owner`.
    ///
    /// Returns `false` if another owner holds an unexpired lock.
    /// The lock expires on its own after `ttl`.
    ///
    /// # Errors
    ///
    /// `Lock` on backend failure.
    async fn try_acquire(
        &self,
        key: &str,
        owner: &str,
        ttl: Duration,
    ) -> Result<bool, FeatureFlagsError>;

    /// Releases the lock at `key` if it is still held by `owner`.
    ///
    /// Returns `false` if the lock had expired or belongs to someone else.
    ///
    /// # Errors
    ///
    /// `Lock` on backend failure.
    async fn release(&self, key: &str, owner: &str) -> Result<bool, FeatureFlagsError>;
}
