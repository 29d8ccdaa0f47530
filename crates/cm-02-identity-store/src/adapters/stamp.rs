//! # Integrity Stamps
//!
//! `<file>.mac` holds the hex HMAC-SHA256 of the file's full contents. The
//! stamp is rewritten atomically after every append.

use super::write_atomic;
use crate::domain::errors::StoreError;
use crate::ports::outbound::{IntegrityStamp, StampStatus};
use shared_crypto::{stamp_digest, verify_stamp, FileKey};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stamp file extension appended to the stamped file's name.
pub const STAMP_SUFFIX: &str = ".mac";

/// Path of the stamp belonging to `file`.
pub fn stamp_path(file: &Path) -> PathBuf {
    let mut name = file.as_os_str().to_owned();
    name.push(STAMP_SUFFIX);
    PathBuf::from(name)
}

/// HMAC stamps keyed by the file key.
#[derive(Debug, Clone)]
pub struct HmacFileStamp {
    key: FileKey,
}

impl HmacFileStamp {
    pub fn new(key: FileKey) -> Self {
        Self { key }
    }
}

impl IntegrityStamp for HmacFileStamp {
    fn refresh(&self, file: &Path, contents: &[u8]) -> Result<(), StoreError> {
        let digest = stamp_digest(&self.key, contents);
        write_atomic(&stamp_path(file), hex::encode(digest).as_bytes())
    }

    fn check(&self, file: &Path, contents: &[u8]) -> Result<StampStatus, StoreError> {
        let path = stamp_path(file);
        let recorded = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StampStatus::Missing),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let status = match hex::decode(recorded.trim()) {
            Ok(expected) if verify_stamp(&self.key, contents, &expected) => StampStatus::Valid,
            _ => StampStatus::Mismatch,
        };
        Ok(status)
    }
}
