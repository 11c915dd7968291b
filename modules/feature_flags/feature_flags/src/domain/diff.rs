//! Planning of one plugin's contribution to a guild's flag set.

use std::collections::BTreeSet;

use feature_flags_sdk::{FlagDiff, FlagName};

/// What to write for one plugin, plus what had to be thrown away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffPlan {
    pub diff: FlagDiff,
    /// Active flags the plugin reported outside its own universe.
    pub rejected: Vec<FlagName>,
}

/// Computes the diff for a plugin with declared `universe` reporting `active`.
///
/// Active flags not in the universe are rejected, never stored. Every
/// universe flag that is not active is removed. Duplicates collapse.
#[must_use]
pub fn plan(universe: &[FlagName], active: Vec<FlagName>) -> DiffPlan {
    let universe: BTreeSet<&str> = universe.iter().map(String::as_str).collect();

    let mut add = BTreeSet::new();
    let mut rejected = BTreeSet::new();
    for flag in active {
        if universe.contains(flag.as_str()) {
            add.insert(flag);
        } else {
            rejected.insert(flag);
        }
    }

    let remove = universe
        .iter()
        .filter(|flag| !add.contains(**flag))
        .map(|flag| (*flag).to_owned())
        .collect();

    DiffPlan {
        diff: FlagDiff {
            add: add.into_iter().collect(),
            remove,
        },
        rejected: rejected.into_iter().collect(),
    }
}
