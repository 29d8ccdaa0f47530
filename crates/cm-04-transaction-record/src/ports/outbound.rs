//! # Outbound Ports
//!
//! Where a transaction finds its signer's key.
//!
//! Production: `IdentityStore` (adapters/directory.rs).

use shared_crypto::Ed25519PublicKey;
use shared_types::UserId;

/// Resolves the public key currently on file for a user.
pub trait SignerKeyDirectory: Send + Sync {
    /// `None` when the user or their certificate is unknown or unusable.
    fn signer_key(&self, user_id: &UserId) -> Option<Ed25519PublicKey>;
}
