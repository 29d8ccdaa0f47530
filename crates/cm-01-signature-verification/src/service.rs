//! # Signature Verification Service
//!
//! Application service layer that implements the `SignatureVerificationApi` trait.
//!
//! Stateless. It delegates to the domain layer and records rejections at
//! `debug` level.

use crate::domain::entities::{VerificationRequest, VerificationResult};
use crate::domain::verifier;
use crate::ports::inbound::SignatureVerificationApi;
use shared_crypto::Ed25519PublicKey;
use tracing::debug;

/// Signature Verification Service.
#[derive(Debug, Clone, Default)]
pub struct SignatureVerificationService;

impl SignatureVerificationService {
    /// Create a new signature verification service.
    pub fn new() -> Self {
        Self
    }
}

impl SignatureVerificationApi for SignatureVerificationService {
    fn verify(&self, public_key: &Ed25519PublicKey, message: &[u8], signature: &[u8]) -> bool {
        let result = verifier::verify_detailed(public_key, message, signature);
        if let Some(reason) = &result.error {
            debug!(
                "[cm-01] signature rejected for key {}: {}",
                hex::encode(&public_key.as_bytes()[..4]),
                reason
            );
        }
        result.valid
    }

    fn verify_detailed(&self, request: &VerificationRequest) -> VerificationResult {
        verifier::verify_detailed(&request.public_key, &request.message, &request.signature)
    }
}

// =============================================================================
// TESTS
// =============================================================================
