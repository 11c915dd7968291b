//! Domain models for the feature flags module.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a guild (tenant).
pub type GuildId = i64;

/// Name of a single feature flag. Opaque to the core.
pub type FlagName = String;

/// The set of flags a guild currently has.
pub type FlagSet = BTreeSet<FlagName>;

/// Changes to apply to one guild's stored flag set.
///
/// Backends apply `add` before `remove`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDiff {
    /// Flags to add (set semantics, already-present members are a no-op).
    pub add: Vec<FlagName>,
    /// Flags to remove (absent members are a no-op).
    pub remove: Vec<FlagName>,
}

impl FlagDiff {
    /// Returns `true` if applying this diff would send nothing to the store.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}
