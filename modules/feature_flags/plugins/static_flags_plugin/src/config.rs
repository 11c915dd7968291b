//! Configuration for the static flags plugin.

use feature_flags_sdk::{FlagName, GuildId};
use serde::{Deserialize, Serialize};

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticFlagsPluginConfig {
    /// System name reported to the reconciler.
    pub sys_name: String,

    /// Universe of flags this plugin owns.
    pub flags: Vec<FlagName>,

    /// Active flags per guild.
    pub guilds: Vec<GuildFlagsConfig>,
}

impl Default for StaticFlagsPluginConfig {
    fn default() -> Self {
        Self {
            sys_name: "static".to_owned(),
            flags: Vec::new(),
            guilds: Vec::new(),
        }
    }
}

/// Active flags of a single guild.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GuildFlagsConfig {
    pub id: GuildId,

    #[serde(default)]
    pub active: Vec<FlagName>,
}
