//! # Runtime Configuration
//!
//! Defaults, environment overrides and production checks.
//!
//! ## Security Requirements
//!
//! - `file_key` MUST NOT be the default zero value in production
//! - The key is never logged

use cm_02_identity_store::StoreConfig;
use cm_03_auth_handshake::HandshakeConfig;
use shared_crypto::FileKey;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Listen address override.
pub const ENV_LISTEN_ADDR: &str = "CELLAR_LISTEN_ADDR";
/// Data directory override.
pub const ENV_DATA_DIR: &str = "CELLAR_DATA_DIR";
/// Certificate directory override.
pub const ENV_CERT_DIR: &str = "CELLAR_CERT_DIR";
/// File key, 64 hex characters.
pub const ENV_FILE_KEY: &str = "CELLAR_FILE_KEY";
/// Per-read handshake timeout in seconds; `0` disables it.
pub const ENV_HANDSHAKE_TIMEOUT: &str = "CELLAR_HANDSHAKE_TIMEOUT_SECS";

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Network configuration.
    pub network: NetworkConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Security configuration.
    pub security: SecurityConfig,
}

impl RuntimeConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden through `lookup`. Unparseable values are logged
    /// and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup(ENV_LISTEN_ADDR) {
            match addr.parse() {
                Ok(addr) => config.network.listen_addr = addr,
                Err(_) => warn!("{} is not a socket address: {}", ENV_LISTEN_ADDR, addr),
            }
        }
        if let Some(secs) = lookup(ENV_HANDSHAKE_TIMEOUT) {
            match secs.parse() {
                Ok(secs) => config.network.handshake_timeout_secs = secs,
                Err(_) => warn!("{} must be a whole number of seconds", ENV_HANDSHAKE_TIMEOUT),
            }
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_CERT_DIR) {
            config.storage.cert_dir = Some(PathBuf::from(dir));
        }
        if let Some(key_hex) = lookup(ENV_FILE_KEY) {
            match FileKey::from_hex(&key_hex) {
                Ok(key) => {
                    config.security.file_key = key;
                    info!("Loaded file key from environment");
                }
                Err(_) => warn!("{} must be 32 bytes (64 hex chars)", ENV_FILE_KEY),
            }
        }

        config
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if the file key is the default zero value.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.security.file_key.is_zero() {
            return Err(ConfigError::InsecureFileKey);
        }
        Ok(())
    }

    /// Store layout derived from the storage section.
    pub fn store_config(&self) -> StoreConfig {
        let mut store = StoreConfig::in_dir(&self.storage.data_dir);
        if let Some(cert_dir) = &self.storage.cert_dir {
            store.cert_dir = cert_dir.clone();
        }
        store
    }

    /// Handshake settings derived from the network section.
    pub fn handshake_config(&self) -> HandshakeConfig {
        HandshakeConfig {
            read_timeout: match self.network.handshake_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File key is not set (zero value).
    #[error(
        "SECURITY VIOLATION: file key is default zero value. \
         Set the CELLAR_FILE_KEY environment variable."
    )]
    InsecureFileKey,
}

/// Network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Address the marketplace listens on.
    pub listen_addr: SocketAddr,
    /// Per-read handshake timeout in seconds (0 = none).
    pub handshake_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 12345)),
            handshake_timeout_secs: 30,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Catalog and credential files.
    pub data_dir: PathBuf,
    /// Certificates; `data_dir/certs` when unset.
    pub cert_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            cert_dir: None,
        }
    }
}

/// Security configuration.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Key for line encryption and integrity stamps.
    /// MUST NOT be default in production.
    pub file_key: FileKey,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            file_key: FileKey::from_bytes([0u8; 32]), // MUST be overridden in production
        }
    }
}
