//! In-process plugin registry.

use std::sync::Arc;

use feature_flags_sdk::{Plugin, PluginRegistry};
use parking_lot::RwLock;

/// Registry holding plugins registered at startup.
///
/// Plugins are returned in registration order.
#[derive(Default)]
pub struct StaticPluginRegistry {
    plugins: RwLock<Vec<Arc<dyn Plugin>>>,
}

impl StaticPluginRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plugin. A plugin with the same sys name replaces the old one.
    pub fn register(&self, plugin: Arc<dyn Plugin>) {
        let mut plugins = self.plugins.write();
        if let Some(slot) = plugins
            .iter_mut()
            .find(|p| p.sys_name() == plugin.sys_name())
        {
            *slot = plugin;
        } else {
            plugins.push(plugin);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.read().is_empty()
    }
}

impl PluginRegistry for StaticPluginRegistry {
    fn plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.plugins.read().clone()
    }
}
