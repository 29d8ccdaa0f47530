//! `IdentityStore` as the handshake's identity directory.

use crate::ports::outbound::IdentityDirectory;
use cm_02_identity_store::{CredentialLine, IdentityRecord, IdentityStore, StoreError};
use shared_crypto::Certificate;
use shared_types::UserId;

impl IdentityDirectory for IdentityStore {
    fn credential_for(&self, user_id: &str) -> Option<CredentialLine> {
        IdentityStore::credential_for(self, user_id)
    }

    fn load_certificate(&self, file_name: &str) -> Result<Certificate, StoreError> {
        IdentityStore::load_certificate(self, file_name)
    }

    fn register(
        &self,
        user_id: UserId,
        certificate: &Certificate,
    ) -> Result<IdentityRecord, StoreError> {
        IdentityStore::register(self, user_id, certificate)
    }
}
