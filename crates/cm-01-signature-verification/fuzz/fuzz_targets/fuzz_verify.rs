//! Fuzz target for Ed25519 signature verification.
//!
//! Arbitrary keys, messages and signature blobs must never panic and must
//! always produce the same verdict twice.
//!
//! ## Running
//!
//! ```bash
//! cd crates/cm-01-signature-verification
//! cargo +nightly fuzz run fuzz_verify
//! ```

#![no_main]

use cm_01_signature_verification::{verify, verify_detailed};
use libfuzzer_sys::fuzz_target;
use shared_crypto::Ed25519PublicKey;

/// Fuzz input structure for verification.
#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzInput {
    /// Candidate public key bytes
    public_key: [u8; 32],
    /// Signed message
    message: Vec<u8>,
    /// Signature blob of any length
    signature: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    // Most random 32-byte strings are not valid points; those are skipped.
    let Ok(public_key) = Ed25519PublicKey::from_bytes(input.public_key) else {
        return;
    };

    let verdict = verify(&public_key, &input.message, &input.signature);
    let detailed = verify_detailed(&public_key, &input.message, &input.signature);

    assert_eq!(verdict, detailed.valid);
    assert_eq!(detailed.valid, detailed.error.is_none());
});
