//! Key naming in the shared key-value store.

use feature_flags_sdk::GuildId;

/// Key of the set holding a guild's flags.
#[must_use]
pub fn guild_flags(guild_id: GuildId) -> String {
    format!("f_flags:{guild_id}")
}

/// Key of the lock serializing a guild's flag updates.
#[must_use]
pub fn guild_update_lock(guild_id: GuildId) -> String {
    format!("feature_flags_updating:{guild_id}")
}
