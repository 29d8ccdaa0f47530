//! # Domain Entities
//!
//! Request and result types for signature verification.

use super::errors::SignatureError;
use shared_crypto::Ed25519PublicKey;

/// A single verification job: does `signature` over `message` check out
/// under `public_key`?
#[derive(Clone, Debug)]
pub struct VerificationRequest {
    /// Key the signature must verify under
    pub public_key: Ed25519PublicKey,
    /// Exact signed bytes
    pub message: Vec<u8>,
    /// Opaque signature blob as received
    pub signature: Vec<u8>,
}

/// Outcome of a verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether the signature is valid
    pub valid: bool,
    /// Reason for rejection (if verification failed)
    pub error: Option<SignatureError>,
}

impl VerificationResult {
    /// Create a successful verification result.
    pub fn valid() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    /// Create a failed verification result.
    pub fn invalid(error: SignatureError) -> Self {
        Self {
            valid: false,
            error: Some(error),
        }
    }
}
