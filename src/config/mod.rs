//! Configuration loading and layering.
//!
//! Handles `.coddoc.toml` loading, environment variable resolution,
//! and CLI flag merging with proper priority ordering.

pub mod loader;

pub use loader::{BackendConfig, Config, ConfigError, ProvidersConfig, StoreBackend, StoreConfig};
