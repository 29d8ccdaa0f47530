//! # Adapters
//!
//! Filesystem and crypto implementations behind the store.

pub mod cipher;
pub mod line_file;
pub mod lock;
pub mod stamp;
pub mod vault;

pub use cipher::FileKeyCipher;
pub use line_file::LineFile;
pub use lock::StoreLock;
pub use stamp::HmacFileStamp;
pub use vault::CertificateVault;

use crate::domain::errors::StoreError;
use std::io::Write;
use std::path::Path;

/// Replace `path` with `bytes` via a synced temp file and a rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = std::path::PathBuf::from(temp_name);

    let mut file = std::fs::File::create(&temp_path).map_err(|e| StoreError::io(&temp_path, e))?;
    file.write_all(bytes)
        .and_then(|_| file.sync_all())
        .map_err(|e| StoreError::io(&temp_path, e))?;

    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        StoreError::io(path, e)
    })
}
