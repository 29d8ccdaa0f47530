//! # Outbound Ports (Driven Ports)
//!
//! Services the store needs from its host: a line cipher for file contents
//! and an integrity stamp over whole files.
//!
//! Production: `FileKeyCipher` and `HmacFileStamp` (adapters), both keyed by
//! the process-wide file key.

use crate::domain::errors::StoreError;
use std::path::Path;

/// Reversible transform applied to every stored line.
pub trait LineCipher: Send + Sync {
    /// Seal a plaintext line. The output must not contain `\r` or `\n`.
    fn seal(&self, plaintext: &str) -> Result<String, StoreError>;

    /// Open a sealed line.
    fn open(&self, sealed: &str) -> Result<String, StoreError>;
}

/// Outcome of checking a file against its stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampStatus {
    /// Stamp present and matching.
    Valid,
    /// No stamp has ever been written.
    Missing,
    /// Stamp present but the contents changed.
    Mismatch,
}

/// Tamper evidence for a whole file.
pub trait IntegrityStamp: Send + Sync {
    /// Record a stamp for `contents`, the current contents of `file`.
    fn refresh(&self, file: &Path, contents: &[u8]) -> Result<(), StoreError>;

    /// Compare `contents` of `file` with its recorded stamp.
    fn check(&self, file: &Path, contents: &[u8]) -> Result<StampStatus, StoreError>;
}
