//! # Signature Errors
//!
//! Reasons a verification came back negative. These are carried inside a
//! [`VerificationResult`](super::entities::VerificationResult) for logging;
//! callers of [`verify`](super::verifier::verify) only ever see a `bool`.

use thiserror::Error;

/// Why a signature was not accepted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature is not a 64-byte Ed25519 signature
    #[error("Invalid signature format: {len} bytes")]
    InvalidFormat { len: usize },

    /// The public key does not decode to a usable curve point
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Signature does not match message and key
    #[error("Signature verification failed")]
    VerificationFailed,
}
