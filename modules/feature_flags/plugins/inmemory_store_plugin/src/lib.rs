//! In-memory backend plugin for feature flags.
//!
//! Provides both backend capabilities the feature flags core needs, a
//! set-valued key-value store and a TTL-bound owner-checked lock, inside
//! a single process. Suitable for tests, local runs and single-node
//! deployments; state is lost on restart.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod lock;
mod store;

pub use store::InMemoryStore;
