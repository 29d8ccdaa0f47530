//! # Persistence Across Restarts
//!
//! Registrations made through the handshake survive a restart; a tampered
//! catalog or a second store on the same directory stops startup.

#[cfg(test)]
mod tests {
    use super::super::fixtures::Market;
    use cm_02_identity_store::{IdentityStore, StoreConfig, StoreError};
    use shared_crypto::Ed25519KeyPair;

    #[tokio::test]
    async fn test_restart_reloads_and_relogin_works() {
        let market = Market::open();
        let erin_key = Ed25519KeyPair::generate();
        market.login("erin", &erin_key).await.0.unwrap();

        let dir = market.dir;
        let key = market.key;
        drop(market.authenticator);
        drop(market.store);

        let store = IdentityStore::open(StoreConfig::in_dir(dir.path()), key).unwrap();
        assert_eq!(store.user_count(), 1);
        assert_eq!(store.credential_count(), 1);
        assert_eq!(store.get_public_key("erin"), Some(erin_key.public_key()));
    }

    #[tokio::test]
    async fn test_tampered_credentials_refuse_restart() {
        let market = Market::open();
        market.login("frank", &Ed25519KeyPair::generate()).await.0.unwrap();

        let dir = market.dir;
        let key = market.key;
        drop(market.authenticator);
        drop(market.store);

        let config = StoreConfig::in_dir(dir.path());
        let mut contents = std::fs::read(config.credentials_path()).unwrap();
        contents.extend_from_slice(b"00\r\n");
        std::fs::write(config.credentials_path(), contents).unwrap();

        assert!(matches!(
            IdentityStore::open(config, key),
            Err(StoreError::IntegrityMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_second_store_on_live_directory_refused() {
        let market = Market::open();
        assert!(matches!(
            IdentityStore::open(StoreConfig::in_dir(market.dir.path()), market.key.clone()),
            Err(StoreError::Locked { .. })
        ));
    }
}
