//! # Concurrent First Contact
//!
//! Several clients claim the same new identifier at once. Each passes the
//! lookup (no credential yet) and proves its own key; exactly one
//! registration may land.

#[cfg(test)]
mod tests {
    use super::super::fixtures::Market;
    use cm_03_auth_handshake::HandshakeError;
    use futures::future::join_all;
    use shared_crypto::Ed25519KeyPair;
    use std::sync::Arc;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_only_one_registration_wins() {
        let market = Arc::new(Market::open());
        let keypairs: Vec<Arc<Ed25519KeyPair>> =
            (0..8).map(|_| Arc::new(Ed25519KeyPair::generate())).collect();

        let attempts = keypairs.iter().cloned().map(|keypair| {
            let market = market.clone();
            tokio::spawn(async move { market.login("dora", &keypair).await.0 })
        });
        let results: Vec<_> = join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        let registered = results
            .iter()
            .filter(|r| matches!(r, Ok(user) if user.registered))
            .count();
        assert_eq!(registered, 1);

        // Losers either raced into the store re-check or saw the credential
        // and failed the known-user proof; both are credential failures.
        for result in &results {
            if let Err(e) = result {
                assert!(
                    matches!(e, HandshakeError::InvalidCredentials(_)),
                    "unexpected error {:?}",
                    e
                );
            }
        }

        assert_eq!(market.store.user_count(), 1);
        assert_eq!(market.store.credential_count(), 1);

        let winner_key = market.store.get_public_key("dora").unwrap();
        assert!(keypairs.iter().any(|k| k.public_key() == winner_key));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_distinct_users_register_concurrently() {
        let market = Arc::new(Market::open());

        let attempts = (0..10).map(|i| {
            let market = market.clone();
            tokio::spawn(async move {
                let keypair = Ed25519KeyPair::generate();
                market.login(&format!("user{}", i), &keypair).await.0
            })
        });
        for joined in join_all(attempts).await {
            assert!(joined.unwrap().unwrap().registered);
        }

        assert_eq!(market.store.user_count(), 10);
        assert_eq!(market.store.credential_count(), 10);
    }
}
