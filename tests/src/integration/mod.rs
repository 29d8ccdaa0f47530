//! Integration flows across the store, handshake, verifier and runtime.

pub mod alice_scenario;
pub mod persistence;
pub mod registration_race;

#[cfg(test)]
pub(crate) mod fixtures {
    use cm_01_signature_verification::SignatureVerificationService;
    use cm_02_identity_store::{IdentityStore, StoreConfig};
    use cm_03_auth_handshake::{
        AuthenticatedUser, Authenticator, HandshakeClient, HandshakeConfig, HandshakeError,
    };
    use shared_crypto::{Ed25519KeyPair, FileKey};
    use shared_types::UserId;
    use std::sync::Arc;
    use tempfile::TempDir;

    pub struct Market {
        pub dir: TempDir,
        pub key: FileKey,
        pub store: Arc<IdentityStore>,
        pub authenticator: Authenticator,
    }

    impl Market {
        pub fn open() -> Self {
            let dir = TempDir::new().unwrap();
            let key = FileKey::generate();
            let store = Arc::new(
                IdentityStore::open(StoreConfig::in_dir(dir.path()), key.clone()).unwrap(),
            );
            let authenticator = Authenticator::new(
                store.clone(),
                Arc::new(SignatureVerificationService::new()),
                HandshakeConfig::default(),
            );
            Self {
                dir,
                key,
                store,
                authenticator,
            }
        }

        /// Full handshake over an in-memory pipe.
        pub async fn login(
            &self,
            name: &str,
            keypair: &Ed25519KeyPair,
        ) -> (
            Result<AuthenticatedUser, HandshakeError>,
            Result<bool, HandshakeError>,
        ) {
            let (server_io, client_io) = tokio::io::duplex(64 * 1024);
            let user = UserId::new(name).unwrap();
            tokio::join!(
                self.authenticator.serve(server_io),
                HandshakeClient::login(client_io, &user, keypair)
            )
        }
    }
}
