use std::collections::HashMap;

use async_trait::async_trait;
use feature_flags_sdk::{FeatureFlagsError, FlagDiff, FlagName, FlagSet, KeyValueStore};
use parking_lot::Mutex;

use crate::lock::LockTable;

/// Process-local store of string sets plus lock table.
#[derive(Default)]
pub struct InMemoryStore {
    pub(crate) sets: Mutex<HashMap<String, FlagSet>>,
    pub(crate) locks: Mutex<LockTable>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the set at `key`. Intended for seeding.
    pub fn seed<I, S>(&self, key: &str, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<FlagName>,
    {
        let set: FlagSet = members.into_iter().map(Into::into).collect();
        self.sets.lock().insert(key.to_owned(), set);
    }

    /// Synchronous snapshot of the set at `key`.
    #[must_use]
    pub fn snapshot(&self, key: &str) -> FlagSet {
        self.sets.lock().get(key).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn members(&self, key: &str) -> Result<FlagSet, FeatureFlagsError> {
        Ok(self.snapshot(key))
    }

    async fn add_members(&self, key: &str, members: &[FlagName]) -> Result<(), FeatureFlagsError> {
        if members.is_empty() {
            return Ok(());
        }
        self.sets
            .lock()
            .entry(key.to_owned())
            .or_default()
            .extend(members.iter().cloned());
        Ok(())
    }

    async fn remove_members(
        &self,
        key: &str,
        members: &[FlagName],
    ) -> Result<(), FeatureFlagsError> {
        let mut sets = self.sets.lock();
        if let Some(set) = sets.get_mut(key) {
            for member in members {
                set.remove(member);
            }
            // An empty set is the same as a missing key.
            if set.is_empty() {
                sets.remove(key);
            }
        }
        Ok(())
    }

    async fn apply_diff(&self, key: &str, diff: &FlagDiff) -> Result<(), FeatureFlagsError> {
        if diff.is_empty() {
            return Ok(());
        }
        let mut sets = self.sets.lock();
        let set = sets.entry(key.to_owned()).or_default();
        set.extend(diff.add.iter().cloned());
        for member in &diff.remove {
            set.remove(member);
        }
        if set.is_empty() {
            sets.remove(key);
        }
        Ok(())
    }
}
