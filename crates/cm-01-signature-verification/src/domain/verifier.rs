//! # Ed25519 Verification
//!
//! Pure domain logic for checking a user's signature.
//!
//! ## Security Notes
//!
//! - Uses strict verification (`verify_strict`): small-order public keys and
//!   non-canonical `S` scalars are rejected, so a signature cannot be mauled
//!   into a second valid encoding.
//! - No error escapes [`verify`]. Any malformed input is a plain `false`.

use super::entities::{VerificationRequest, VerificationResult};
use super::errors::SignatureError;
use shared_crypto::signatures::SIGNATURE_LEN;
use shared_crypto::{CryptoError, Ed25519PublicKey};

/// Ed25519 signature verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl Ed25519Verifier {
    /// Create a new verifier.
    pub fn new() -> Self {
        Self
    }

    /// See [`verify`].
    pub fn verify(&self, public_key: &Ed25519PublicKey, message: &[u8], signature: &[u8]) -> bool {
        verify(public_key, message, signature)
    }

    /// See [`verify_detailed`].
    pub fn verify_detailed(&self, request: &VerificationRequest) -> VerificationResult {
        verify_detailed(&request.public_key, &request.message, &request.signature)
    }
}

// =============================================================================
// CORE VERIFICATION FUNCTIONS
// =============================================================================

/// Check `signature` over `message` under `public_key`.
///
/// Side-effect free. Malformed signatures and unusable keys are reported as
/// `false`, never as an error.
pub fn verify(public_key: &Ed25519PublicKey, message: &[u8], signature: &[u8]) -> bool {
    verify_detailed(public_key, message, signature).valid
}

/// Same as [`verify`] but keeps the rejection reason.
pub fn verify_detailed(
    public_key: &Ed25519PublicKey,
    message: &[u8],
    signature: &[u8],
) -> VerificationResult {
    if signature.len() != SIGNATURE_LEN {
        return VerificationResult::invalid(SignatureError::InvalidFormat {
            len: signature.len(),
        });
    }

    match public_key.verify(message, signature) {
        Ok(()) => VerificationResult::valid(),
        Err(CryptoError::InvalidPublicKey) => {
            VerificationResult::invalid(SignatureError::InvalidPublicKey)
        }
        Err(CryptoError::InvalidSignatureFormat) => {
            VerificationResult::invalid(SignatureError::InvalidFormat {
                len: signature.len(),
            })
        }
        Err(_) => VerificationResult::invalid(SignatureError::VerificationFailed),
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


// =============================================================================
// UNIT TESTS
// =============================================================================
