//! Feature Flags Module
//!
//! Keeps a per-guild set of boolean feature flags. The authoritative
//! values are computed by flag provider plugins and persisted in a shared
//! key-value store; reads go through a process-local cache.
//!
//! - [`domain::FlagCache`] serves reads and fills itself from the store.
//! - [`domain::Reconciler`] recomputes one guild's flags across all
//!   plugins under a guild-scoped distributed lock.
//! - [`FeatureFlagsModule`] wires both behind the SDK's
//!   [`FeatureFlagsClient`](feature_flags_sdk::FeatureFlagsClient).

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod module;

pub use config::FeatureFlagsConfig;
pub use feature_flags_sdk::*;
pub use module::{FeatureFlagsBackends, FeatureFlagsModule};
