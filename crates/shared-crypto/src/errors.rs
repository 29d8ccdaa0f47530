//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (wrong key, tampered ciphertext)
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Sealed line is not valid hex or is shorter than the nonce
    #[error("Malformed sealed line: {0}")]
    MalformedCiphertext(String),

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Invalid signature format
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Certificate could not be parsed as X.509 DER
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),

    /// Certificate carries a key type other than Ed25519
    #[error("Unsupported certificate key algorithm: {0}")]
    UnsupportedKeyAlgorithm(String),

    /// PEM armor could not be decoded
    #[error("Invalid PEM: {0}")]
    InvalidPem(String),

    /// Certificate issuance failed
    #[error("Certificate issuance failed: {0}")]
    IssuanceFailed(String),
}
