//! Runtime configuration container.

pub mod config;

pub use config::{ConfigError, NetworkConfig, RuntimeConfig, SecurityConfig, StorageConfig};
