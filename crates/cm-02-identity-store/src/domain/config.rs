//! # Store Configuration
//!
//! File layout of the identity store.

use super::entities::STARTING_BALANCE;
use std::path::{Path, PathBuf};

/// Where the store keeps its files.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the catalog, credential file, stamps and lock.
    pub data_dir: PathBuf,
    /// Directory holding one PEM certificate per registered user.
    pub cert_dir: PathBuf,
    /// Catalog file name within `data_dir`.
    pub catalog_file: String,
    /// Credential file name within `data_dir`.
    pub credentials_file: String,
    /// Balance granted to newly registered users.
    pub starting_balance: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_dir("./data")
    }
}

impl StoreConfig {
    /// Default layout rooted at `dir`, certificates in `dir/certs`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let data_dir = dir.as_ref().to_path_buf();
        Self {
            cert_dir: data_dir.join("certs"),
            data_dir,
            catalog_file: "user_catalog.txt".to_string(),
            credentials_file: "user_credentials.txt".to_string(),
            starting_balance: STARTING_BALANCE,
        }
    }

    /// Full path of the catalog file.
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }

    /// Full path of the credential file.
    pub fn credentials_path(&self) -> PathBuf {
        self.data_dir.join(&self.credentials_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_layout() {
        let config = StoreConfig::in_dir("/srv/market");
        assert_eq!(config.catalog_path(), PathBuf::from("/srv/market/user_catalog.txt"));
        assert_eq!(
            config.credentials_path(),
            PathBuf::from("/srv/market/user_credentials.txt")
        );
        assert_eq!(config.cert_dir, PathBuf::from("/srv/market/certs"));
        assert_eq!(config.starting_balance, 200.0);
    }
}
