//! Domain layer for the feature flags module.

pub mod cache;
pub mod diff;
pub mod error;
pub mod keys;
pub mod local_client;
pub mod lock;
pub mod reconcile;
pub mod registry;
pub mod service;

pub use cache::FlagCache;
pub use error::DomainError;
pub use local_client::FeatureFlagsLocalClient;
pub use lock::{GuildLocker, LockGuard, LockSettings};
pub use reconcile::{PluginOutcome, ReconcileReport, Reconciler};
pub use registry::StaticPluginRegistry;
pub use service::Service;
