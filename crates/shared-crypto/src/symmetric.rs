//! # Symmetric Encryption
//!
//! XChaCha20-Poly1305 sealing of individual text lines under the process-wide
//! file key. A sealed line is `hex(nonce ‖ ciphertext)`, so it never contains
//! a line terminator and can be stored one per line.
//!
//! ## Security Properties
//!
//! - **XChaCha20-Poly1305**: 192-bit random nonce per line, authenticated
//! - A tampered or truncated line fails to open instead of yielding garbage

use crate::CryptoError;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use zeroize::Zeroize;

/// Length of the file key in bytes.
pub const FILE_KEY_LEN: usize = 32;

/// XChaCha20 nonce length in bytes.
pub const NONCE_LEN: usize = 24;

/// Process-wide symmetric key protecting on-disk files (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct FileKey([u8; FILE_KEY_LEN]);

impl FileKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; FILE_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        let mut decoded =
            hex::decode(encoded.trim()).map_err(|_| CryptoError::InvalidKeyLength {
                expected: FILE_KEY_LEN,
                actual: 0,
            })?;
        if decoded.len() != FILE_KEY_LEN {
            let actual = decoded.len();
            decoded.zeroize();
            return Err(CryptoError::InvalidKeyLength {
                expected: FILE_KEY_LEN,
                actual,
            });
        }
        let mut bytes = [0u8; FILE_KEY_LEN];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self(bytes))
    }

    /// Generate random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; FILE_KEY_LEN];
        rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; FILE_KEY_LEN] {
        &self.0
    }

    /// True for the all-zero placeholder key.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; FILE_KEY_LEN]
    }
}

impl std::fmt::Debug for FileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FileKey(..)")
    }
}

/// Direction of a [`cipher_line`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CipherMode {
    /// Plaintext in, sealed line out.
    Encrypt,
    /// Sealed line in, plaintext out.
    Decrypt,
}

/// Encrypt plaintext with XChaCha20-Poly1305 under a fresh random nonce.
///
/// Returns `nonce ‖ ciphertext`.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn encrypt(key: &FileKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let mut nonce = [0u8; NONCE_LEN];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut nonce);

    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt `nonce ‖ ciphertext` produced by [`encrypt`].
///
/// # Errors
///
/// Returns `CryptoError::DecryptionFailed` if authentication fails.
pub fn decrypt(key: &FileKey, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < NONCE_LEN {
        return Err(CryptoError::MalformedCiphertext(format!(
            "{} bytes is shorter than the nonce",
            sealed.len()
        )));
    }
    let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

/// Seal one text line: `hex(nonce ‖ ciphertext)`.
pub fn seal_line(key: &FileKey, plaintext: &str) -> Result<String, CryptoError> {
    encrypt(key, plaintext.as_bytes()).map(hex::encode)
}

/// Open a line produced by [`seal_line`].
pub fn open_line(key: &FileKey, sealed: &str) -> Result<String, CryptoError> {
    let bytes =
        hex::decode(sealed.trim()).map_err(|e| CryptoError::MalformedCiphertext(e.to_string()))?;
    let plaintext = decrypt(key, &bytes)?;
    String::from_utf8(plaintext).map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

/// Mode-driven entry point matching the `encrypt(mode, key, text)` shape used
/// by the file layer.
pub fn cipher_line(mode: CipherMode, key: &FileKey, text: &str) -> Result<String, CryptoError> {
    match mode {
        CipherMode::Encrypt => seal_line(key, text),
        CipherMode::Decrypt => open_line(key, text),
    }
}
