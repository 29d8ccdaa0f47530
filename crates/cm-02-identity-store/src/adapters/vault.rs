//! # Certificate Vault
//!
//! One PEM file per registered user in the certificate directory.

use super::write_atomic;
use crate::domain::errors::StoreError;
use shared_crypto::Certificate;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Certificate directory.
#[derive(Debug, Clone)]
pub struct CertificateVault {
    dir: PathBuf,
}

impl CertificateVault {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the certificates.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a bare file name inside the vault.
    fn path_for(&self, file_name: &str) -> Result<PathBuf, StoreError> {
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name == "."
            || file_name == ".."
        {
            return Err(StoreError::malformed(format!(
                "certificate file {:?} is not a plain file name",
                file_name
            )));
        }
        Ok(self.dir.join(file_name))
    }

    /// Write `certificate` as PEM, replacing any stale file.
    pub fn store(&self, file_name: &str, certificate: &Certificate) -> Result<(), StoreError> {
        let path = self.path_for(file_name)?;
        write_atomic(&path, certificate.to_pem().as_bytes())
    }

    /// Read and parse a stored certificate.
    pub fn load(&self, file_name: &str) -> Result<Certificate, StoreError> {
        let path = self.path_for(file_name)?;
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::CertificateMissing {
                    file_name: file_name.to_owned(),
                })
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };
        Ok(Certificate::from_pem(&text)?)
    }

    /// Delete a stored certificate. Absent files are not an error.
    pub fn remove(&self, file_name: &str) -> Result<(), StoreError> {
        let path = self.path_for(file_name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}
