//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this crate.

use crate::domain::entities::{VerificationRequest, VerificationResult};
use shared_crypto::Ed25519PublicKey;

/// Primary Signature Verification API.
///
/// Implementations must be thread-safe (`Send + Sync`); one instance is
/// shared by every connection task.
pub trait SignatureVerificationApi: Send + Sync {
    /// Check `signature` over `message` under `public_key`.
    ///
    /// Never fails: anything that is not a valid signature is `false`.
    fn verify(&self, public_key: &Ed25519PublicKey, message: &[u8], signature: &[u8]) -> bool;

    /// Verify and keep the rejection reason (for logging).
    fn verify_detailed(&self, request: &VerificationRequest) -> VerificationResult;
}
