//! Error types for the feature flags module.

use std::time::Duration;

use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by the feature flags API, plugins and backends.
#[derive(Debug, Error)]
pub enum FeatureFlagsError {
    /// Key-value store connectivity or command failure.
    #[error("Store error: {message}")]
    Store {
        /// Error message
        message: String,
        /// Underlying store failure
        #[source]
        source: Option<BoxedSource>,
    },

    /// Distributed lock backend failure.
    #[error("Lock error: {message}")]
    Lock {
        /// Error message
        message: String,
        /// Underlying lock backend failure
        #[source]
        source: Option<BoxedSource>,
    },

    /// The lock could not be acquired within the wait bound.
    #[error("Timed out after {waited:?} waiting for lock {key}")]
    LockTimeout {
        /// Lock key
        key: String,
        /// How long the caller waited
        waited: Duration,
    },

    /// A flag provider plugin failed.
    #[error("Plugin {plugin} failed: {message}")]
    Provider {
        /// Plugin system name
        plugin: String,
        /// Error message
        message: String,
        /// Underlying plugin failure
        #[source]
        source: Option<BoxedSource>,
    },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message
        message: String,
        /// Source error
        #[source]
        source: Option<BoxedSource>,
    },
}

impl FeatureFlagsError {
    /// Create a store error with a message only.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Create a store error with a source error.
    pub fn store_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a lock error with a message only.
    pub fn lock(message: impl Into<String>) -> Self {
        Self::Lock {
            message: message.into(),
            source: None,
        }
    }

    /// Create a lock error with a source error.
    pub fn lock_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Lock {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a plugin error with a message only.
    pub fn provider(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            plugin: plugin.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a plugin error with a source error.
    pub fn provider_with_source(
        plugin: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Provider {
            plugin: plugin.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error with a message only.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
