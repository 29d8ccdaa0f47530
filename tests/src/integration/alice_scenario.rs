//! # Alice End-to-End
//!
//! ```text
//! alice (new) ──handshake──→ registered, balance 200, credential line
//! alice       ──handshake──→ authenticated with the same key
//! alice'      ──handshake──→ rejected (foreign key)
//! alice       ──signed tx──→ validates against the stored certificate
//! ```

#[cfg(test)]
mod tests {
    use super::super::fixtures::Market;
    use cm_01_signature_verification::SignatureVerificationService;
    use cm_02_identity_store::{IdentityStore, StoreConfig};
    use cm_03_auth_handshake::{HandshakeClient, HandshakeError};
    use cm_04_transaction_record::TransactionRecord;
    use market_runtime::{MarketRuntime, RuntimeConfig};
    use shared_crypto::Ed25519KeyPair;
    use shared_types::{TransactionKind, UserId};

    #[tokio::test]
    async fn test_alice_registers_and_logs_back_in() {
        let market = Market::open();
        let alice_key = Ed25519KeyPair::generate();

        let (server, client) = market.login("alice", &alice_key).await;
        let user = server.unwrap();
        assert!(user.registered);
        assert_eq!(user.user_id.as_str(), "alice");
        assert!(client.unwrap());

        let record = market.store.get_by_name("alice").unwrap();
        assert_eq!(record.balance, 200.0);
        assert!(record.availability.is_empty());

        let credential = market.store.credential_for("alice").unwrap();
        assert_eq!(credential.certificate_file, "pubkey_alice.cer");
        assert!(market.dir.path().join("certs/pubkey_alice.cer").exists());

        let (server, client) = market.login("alice", &alice_key).await;
        assert!(!server.unwrap().registered);
        assert!(!client.unwrap());

        let (server, client) = market.login("alice", &Ed25519KeyPair::generate()).await;
        assert!(matches!(server, Err(HandshakeError::InvalidCredentials(_))));
        assert!(matches!(client, Err(HandshakeError::InvalidCredentials(_))));

        assert_eq!(market.store.user_count(), 1);
        assert_eq!(market.store.credential_count(), 1);
    }

    #[tokio::test]
    async fn test_public_key_stable_across_calls_and_restart() {
        let market = Market::open();
        let alice_key = Ed25519KeyPair::generate();
        market.login("alice", &alice_key).await.0.unwrap();

        let first = market.store.get_public_key("alice");
        assert_eq!(first, Some(alice_key.public_key()));
        assert_eq!(market.store.get_public_key("alice"), first);

        let Market {
            dir,
            key,
            store,
            authenticator,
        } = market;
        drop(authenticator);
        drop(store);

        let reopened = IdentityStore::open(StoreConfig::in_dir(dir.path()), key).unwrap();
        assert_eq!(reopened.get_public_key("alice"), first);
    }

    #[tokio::test]
    async fn test_signed_transactions_against_registered_key() {
        let market = Market::open();
        let alice_key = Ed25519KeyPair::generate();
        let bob_key = Ed25519KeyPair::generate();
        market.login("alice", &alice_key).await.0.unwrap();
        market.login("bob", &bob_key).await.0.unwrap();

        let verifier = SignatureVerificationService::new();
        let alice = UserId::new("alice").unwrap();

        let sale =
            TransactionRecord::signed(TransactionKind::Sell, "tinto-2019", 5, 18.0, alice.clone(), &alice_key)
                .unwrap();
        assert!(sale.validate(market.store.as_ref(), &verifier));

        // Bob signs an order in Alice's name.
        let forged =
            TransactionRecord::signed(TransactionKind::Buy, "tinto-2019", 5, 18.0, alice.clone(), &bob_key)
                .unwrap();
        assert!(!forged.validate(market.store.as_ref(), &verifier));

        // Unregistered signer.
        let carol = UserId::new("carol").unwrap();
        let orphan =
            TransactionRecord::signed(TransactionKind::Buy, "tinto-2019", 1, 18.0, carol, &bob_key)
                .unwrap();
        assert!(!orphan.validate(market.store.as_ref(), &verifier));
    }

    #[tokio::test]
    async fn test_alice_over_tcp_runtime() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = RuntimeConfig::default();
        config.network.listen_addr = "127.0.0.1:0".parse().unwrap();
        config.storage.data_dir = dir.path().to_path_buf();
        config.security.file_key = shared_crypto::FileKey::generate();
        config.validate_for_production().unwrap();

        let runtime = MarketRuntime::bind(&config).await.unwrap();
        let addr = runtime.local_addr().unwrap();
        let store = runtime.store();
        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(runtime.run(async move {
            let _ = stopped.await;
        }));

        let alice = UserId::new("alice").unwrap();
        let alice_key = Ed25519KeyPair::generate();
        let stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        assert!(HandshakeClient::login(stream, &alice, &alice_key).await.unwrap());

        let stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        assert!(!HandshakeClient::login(stream, &alice, &alice_key).await.unwrap());
        assert_eq!(store.get_by_name("alice").unwrap().balance, 200.0);

        stop.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
