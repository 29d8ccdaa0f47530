//! # Outbound Ports
//!
//! What the handshake needs from the identity store.
//!
//! Production: `IdentityStore` (adapters/directory.rs).

use cm_02_identity_store::{CredentialLine, IdentityRecord, StoreError};
use shared_crypto::Certificate;
use shared_types::UserId;

/// Register-vs-login lookups and the registration write.
pub trait IdentityDirectory: Send + Sync {
    /// Credential for `user_id`, if registered.
    fn credential_for(&self, user_id: &str) -> Option<CredentialLine>;

    /// Stored certificate by file name.
    fn load_certificate(&self, file_name: &str) -> Result<Certificate, StoreError>;

    /// Persist a verified new user. Must refuse an existing `user_id`.
    fn register(
        &self,
        user_id: UserId,
        certificate: &Certificate,
    ) -> Result<IdentityRecord, StoreError>;
}
