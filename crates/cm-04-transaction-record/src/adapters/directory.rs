//! `IdentityStore` as the signer key directory.

use crate::ports::outbound::SignerKeyDirectory;
use cm_02_identity_store::IdentityStore;
use shared_crypto::Ed25519PublicKey;
use shared_types::UserId;

impl SignerKeyDirectory for IdentityStore {
    fn signer_key(&self, user_id: &UserId) -> Option<Ed25519PublicKey> {
        self.get_public_key(user_id.as_str())
    }
}
