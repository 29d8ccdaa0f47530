//! Line cipher keyed by the process-wide file key.

use crate::domain::errors::StoreError;
use crate::ports::outbound::LineCipher;
use shared_crypto::{cipher_line, CipherMode, FileKey};

/// XChaCha20-Poly1305 line sealing under a [`FileKey`].
#[derive(Debug, Clone)]
pub struct FileKeyCipher {
    key: FileKey,
}

impl FileKeyCipher {
    pub fn new(key: FileKey) -> Self {
        Self { key }
    }
}

impl LineCipher for FileKeyCipher {
    fn seal(&self, plaintext: &str) -> Result<String, StoreError> {
        Ok(cipher_line(CipherMode::Encrypt, &self.key, plaintext)?)
    }

    fn open(&self, sealed: &str) -> Result<String, StoreError> {
        Ok(cipher_line(CipherMode::Decrypt, &self.key, sealed)?)
    }
}
