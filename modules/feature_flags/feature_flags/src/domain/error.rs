//! Domain errors for the feature flags module.

use std::time::Duration;

use feature_flags_sdk::{FeatureFlagsError, GuildId};
use thiserror::Error;

/// Domain-level errors for cache fills and reconciliation.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Reading a guild's flag set from the store failed.
    #[error("Failed to read flags of guild {guild_id}")]
    StoreRead {
        guild_id: GuildId,
        #[source]
        source: FeatureFlagsError,
    },

    /// Applying a plugin's diff to the store failed.
    #[error("Failed to store flags of plugin {plugin} for guild {guild_id}")]
    StoreWrite {
        guild_id: GuildId,
        plugin: String,
        #[source]
        source: FeatureFlagsError,
    },

    /// The lock backend failed while acquiring.
    #[error("Failed to acquire lock {key}")]
    LockBackend {
        key: String,
        #[source]
        source: FeatureFlagsError,
    },

    /// The lock stayed held by someone else for the whole wait bound.
    #[error("Timed out after {waited:?} waiting for lock {key}")]
    LockTimeout { key: String, waited: Duration },

    /// A flag provider failed to compute its active flags.
    #[error("Plugin {plugin} failed to update flags of guild {guild_id}")]
    ProviderFailed {
        guild_id: GuildId,
        plugin: String,
        #[source]
        source: FeatureFlagsError,
    },
}

/// Convert domain errors to SDK errors for the API boundary.
impl From<DomainError> for FeatureFlagsError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::StoreRead { guild_id, source } => FeatureFlagsError::store_with_source(
                format!("Failed to read flags of guild {guild_id}"),
                source,
            ),
            DomainError::StoreWrite {
                guild_id,
                plugin,
                source,
            } => FeatureFlagsError::store_with_source(
                format!("Failed to store flags of plugin {plugin} for guild {guild_id}"),
                source,
            ),
            DomainError::LockBackend { key, source } => {
                FeatureFlagsError::lock_with_source(format!("Failed to acquire lock {key}"), source)
            }
            DomainError::LockTimeout { key, waited } => {
                FeatureFlagsError::LockTimeout { key, waited }
            }
            DomainError::ProviderFailed {
                guild_id,
                plugin,
                source,
            } => FeatureFlagsError::provider_with_source(
                plugin,
                format!("Failed to update flags of guild {guild_id}"),
                source,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn store_read_keeps_backend_cause() {
        let err = DomainError::StoreRead {
            guild_id: 42,
            source: FeatureFlagsError::store("connection refused"),
        };

        let sdk: FeatureFlagsError = err.into();

        assert!(matches!(sdk, FeatureFlagsError::Store { .. }));
        let cause = sdk.source().map(ToString::to_string);
        assert_eq!(cause.as_deref(), Some("Store error: connection refused"));
    }

    #[test]
    fn provider_failure_maps_to_provider_variant() {
        let err = DomainError::ProviderFailed {
            guild_id: 7,
            plugin: "premium".to_owned(),
            source: FeatureFlagsError::internal("boom"),
        };

        match FeatureFlagsError::from(err) {
            FeatureFlagsError::Provider { plugin, .. } => assert_eq!(plugin, "premium"),
            other => panic!("Expected Provider, got: {other:?}"),
        }
    }

    #[test]
    fn lock_timeout_is_preserved() {
        let err = DomainError::LockTimeout {
            key: "feature_flags_updating:1".to_owned(),
            waited: Duration::from_secs(3),
        };

        match FeatureFlagsError::from(err) {
            FeatureFlagsError::LockTimeout { key, waited } => {
                assert_eq!(key, "feature_flags_updating:1");
                assert_eq!(waited, Duration::from_secs(3));
            }
            other => panic!("Expected LockTimeout, got: {other:?}"),
        }
    }
}
