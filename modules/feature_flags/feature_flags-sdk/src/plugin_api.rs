//! Plugin-side traits.
//!
//! Every loaded plugin implements [`Plugin`]. Plugins that own feature
//! flags additionally implement [`FlagProvider`] and expose it through
//! [`Plugin::as_flag_provider`]; the reconciler only talks to those.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FeatureFlagsError;
use crate::models::{FlagName, GuildId};

/// A loaded plugin.
pub trait Plugin: Send + Sync {
    /// Stable system name, used in logs and errors.
    fn sys_name(&self) -> &str;

    /// Returns the plugin's flag provider capability, if it has one.
    fn as_flag_provider(&self) -> Option<&dyn FlagProvider> {
        None
    }
}

/// Capability of a plugin that declares and computes its own feature flags.
#[async_trait]
pub trait FlagProvider: Send + Sync {
    /// The static universe of flags this plugin can ever produce.
    ///
    /// Must be stable for the lifetime of the process.
    fn all_feature_flags(&self) -> Vec<FlagName>;

    /// Recomputes the flags currently active for the guild.
    ///
    /// Every returned flag is expected to be part of
    /// [`all_feature_flags`](Self::all_feature_flags); anything else is
    /// dropped by the reconciler and logged as a plugin bug.
    ///
    /// # Errors
    ///
    /// Any plugin-specific failure. It is isolated to this plugin.
    async fn update_feature_flags(
        &self,
        guild_id: GuildId,
    ) -> Result<Vec<FlagName>, FeatureFlagsError>;
}

/// Source of the currently loaded plugins.
pub trait PluginRegistry: Send + Sync {
    /// Snapshot of all loaded plugins, in load order.
    fn plugins(&self) -> Vec<Arc<dyn Plugin>>;
}
