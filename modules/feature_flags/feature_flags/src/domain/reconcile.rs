//! Cross-plugin reconciliation of one guild's flags.
//!
//! Under the guild's update lock, every plugin with a flag provider is
//! asked for its universe and its active flags, and the difference is
//! applied to the stored set (add first, then remove). Plugins are
//! independent: a failing one is recorded and the rest still run.

use std::sync::Arc;

use feature_flags_sdk::{FlagName, FlagProvider, GuildId, KeyValueStore, PluginRegistry};
use tracing::{debug, error, info};

use super::diff;
use super::error::DomainError;
use super::keys;
use super::lock::GuildLocker;

/// What one flag provider contributed to a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginOutcome {
    pub plugin: String,
    pub added: usize,
    pub removed: usize,
    /// Active flags outside the plugin's universe, dropped.
    pub rejected: Vec<FlagName>,
}

/// Result of one reconciliation that held the lock.
#[derive(Debug)]
pub struct ReconcileReport {
    pub guild_id: GuildId,
    pub applied: Vec<PluginOutcome>,
    /// Per-plugin failures, in the order they happened.
    pub failures: Vec<DomainError>,
}

impl ReconcileReport {
    fn new(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            applied: Vec::new(),
            failures: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&DomainError> {
        self.failures.last()
    }

    /// `Ok` if every plugin succeeded, else the most recent failure.
    ///
    /// # Errors
    ///
    /// The last recorded failure.
    pub fn into_result(mut self) -> Result<(), DomainError> {
        match self.failures.pop() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Recomputes guild flags from the registered flag providers.
pub struct Reconciler {
    store: Arc<dyn KeyValueStore>,
    registry: Arc<dyn PluginRegistry>,
    locker: GuildLocker,
}

impl Reconciler {
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        registry: Arc<dyn PluginRegistry>,
        locker: GuildLocker,
    ) -> Self {
        Self {
            store,
            registry,
            locker,
        }
    }

    /// Reconciles the guild's stored flags with every flag provider.
    ///
    /// Returns a report even when plugins failed; see
    /// [`ReconcileReport::into_result`].
    ///
    /// # Errors
    ///
    /// `LockTimeout` / `LockBackend` if the guild lock could not be taken.
    /// Nothing was queried or written in that case.
    #[tracing::instrument(skip_all, fields(guild_id = guild_id))]
    pub async fn reconcile(&self, guild_id: GuildId) -> Result<ReconcileReport, DomainError> {
        let guard = self
            .locker
            .acquire(&keys::guild_update_lock(guild_id))
            .await?;

        let report = self.reconcile_locked(guild_id).await;

        guard.release().await;

        info!(
            plugins = report.applied.len() + report.failures.len(),
            failed = report.failures.len(),
            "Reconciled guild flags"
        );
        Ok(report)
    }

    async fn reconcile_locked(&self, guild_id: GuildId) -> ReconcileReport {
        let mut report = ReconcileReport::new(guild_id);

        for plugin in self.registry.plugins() {
            let Some(provider) = plugin.as_flag_provider() else {
                continue;
            };

            match self
                .reconcile_plugin(guild_id, plugin.sys_name(), provider)
                .await
            {
                Ok(outcome) => report.applied.push(outcome),
                Err(e) => {
                    error!(plugin = %plugin.sys_name(), error = %e, "Failed updating plugin flags");
                    report.failures.push(e);
                }
            }
        }

        report
    }

    async fn reconcile_plugin(
        &self,
        guild_id: GuildId,
        plugin: &str,
        provider: &dyn FlagProvider,
    ) -> Result<PluginOutcome, DomainError> {
        let universe = provider.all_feature_flags();

        let active = provider
            .update_feature_flags(guild_id)
            .await
            .map_err(|source| DomainError::ProviderFailed {
                guild_id,
                plugin: plugin.to_owned(),
                source,
            })?;

        let plan = diff::plan(&universe, active);
        for flag in &plan.rejected {
            error!(plugin, flag = %flag, "Flag is not in the plugin's declared flags, dropping it");
        }

        self.store
            .apply_diff(&keys::guild_flags(guild_id), &plan.diff)
            .await
            .map_err(|source| DomainError::StoreWrite {
                guild_id,
                plugin: plugin.to_owned(),
                source,
            })?;

        debug!(
            plugin,
            added = plan.diff.add.len(),
            removed = plan.diff.remove.len(),
            "Applied plugin flags"
        );

        Ok(PluginOutcome {
            plugin: plugin.to_owned(),
            added: plan.diff.add.len(),
            removed: plan.diff.remove.len(),
            rejected: plan.rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use feature_flags_sdk::FeatureFlagsError;

    use super::*;

    fn provider_failure(plugin: &str) -> DomainError {
        DomainError::ProviderFailed {
            guild_id: 1,
            plugin: plugin.to_owned(),
            source: FeatureFlagsError::internal("boom"),
        }
    }

    #[test]
    fn report_without_failures_is_ok() {
        let report = ReconcileReport::new(1);
        assert!(report.is_success());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn report_yields_last_failure() {
        let mut report = ReconcileReport::new(1);
        report.failures.push(provider_failure("first"));
        report.failures.push(provider_failure("second"));

        assert!(!report.is_success());
        match report.into_result() {
            Err(DomainError::ProviderFailed { plugin, .. }) => assert_eq!(plugin, "second"),
            other => panic!("Expected ProviderFailed, got: {other:?}"),
        }
    }
}
