//! # Domain Errors
//!
//! Error types for the Identity Record Store.
//!
//! ## Design Principles
//!
//! - "Not found" is never an error here: lookups return `Option`
//! - A bad line during load is logged and skipped, it never surfaces as an
//!   error; integrity failures of a whole file do
//! - No panics in store logic (use Result instead)

use shared_crypto::CryptoError;
use shared_types::{IdentifierError, UserId};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure on a specific path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Cipher or certificate failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// A stored line did not parse.
    #[error("Malformed line: {reason}")]
    MalformedLine { reason: String },

    /// A record cannot be written without breaking the line format.
    #[error("Record cannot be encoded: {reason}")]
    Unencodable { reason: String },

    /// File contents do not match their integrity stamp.
    #[error("Integrity stamp mismatch for {}", path.display())]
    IntegrityMismatch { path: PathBuf },

    /// `add_user` for an identifier already in the catalog.
    #[error("User {0} already exists in the catalog")]
    UserExists(UserId),

    /// `register` for an identifier that already has a credential or record.
    #[error("User {0} is already registered")]
    AlreadyRegistered(UserId),

    /// Rejected identifier.
    #[error(transparent)]
    InvalidUserId(#[from] IdentifierError),

    /// Another store instance holds the data directory.
    #[error("Store directory already in use ({}){}", path.display(), pid.map(|p| format!(" by process {}", p)).unwrap_or_default())]
    Locked { pid: Option<u32>, path: PathBuf },

    /// No certificate file under the given name.
    #[error("Certificate {file_name} not found")]
    CertificateMissing { file_name: String },
}

impl StoreError {
    /// Wrap an `io::Error` with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// Shorthand for a parse failure.
    pub fn malformed(reason: impl Into<String>) -> Self {
        StoreError::MalformedLine {
            reason: reason.into(),
        }
    }
}
