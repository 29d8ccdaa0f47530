//! # Authenticator
//!
//! Server side of the handshake. One call per connection; the store lock is
//! only taken inside `credential_for` and `register`, never while waiting on
//! the client. Store calls do file I/O under that lock, so they run on the
//! blocking pool rather than on a runtime worker.
//!
//! A new user is persisted only after the echoed nonce matched and the
//! signature verified under the key in their certificate. Two racing
//! registrations for one identifier resolve in the store: the loser gets
//! `InvalidCredentials`.

use crate::adapters::framing::FramedChannel;
use crate::domain::entities::{AuthenticatedUser, HandshakeConfig};
use crate::domain::errors::HandshakeError;
use crate::domain::messages::{HandshakeMessage, Verdict};
use crate::domain::state::HandshakeState;
use crate::ports::outbound::IdentityDirectory;
use cm_01_signature_verification::SignatureVerificationApi;
use shared_crypto::Certificate;
use shared_types::{ChallengeNonce, UserId};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

/// Runs the server half of the handshake.
#[derive(Clone)]
pub struct Authenticator {
    directory: Arc<dyn IdentityDirectory>,
    verifier: Arc<dyn SignatureVerificationApi>,
    config: HandshakeConfig,
}

impl Authenticator {
    pub fn new(
        directory: Arc<dyn IdentityDirectory>,
        verifier: Arc<dyn SignatureVerificationApi>,
        config: HandshakeConfig,
    ) -> Self {
        Self {
            directory,
            verifier,
            config,
        }
    }

    /// Authenticate, then tell the client the outcome.
    ///
    /// The verdict is best effort: a client that already hung up does not
    /// change the returned result.
    pub async fn serve<S>(&self, stream: S) -> Result<AuthenticatedUser, HandshakeError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut channel = FramedChannel::new(stream, self.config.read_timeout);
        let result = self.run(&mut channel).await;

        let verdict = match &result {
            Ok(_) => Verdict::accepted(),
            Err(e) => Verdict::rejected(e.client_reason()),
        };
        if let Err(e) = channel.send(&HandshakeMessage::Verdict(verdict)).await {
            debug!("[cm-03] verdict not delivered: {}", e);
        }
        result
    }

    /// Run the handshake on `stream` without sending a verdict.
    pub async fn authenticate<S>(&self, stream: S) -> Result<AuthenticatedUser, HandshakeError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut channel = FramedChannel::new(stream, self.config.read_timeout);
        self.run(&mut channel).await
    }

    async fn run<S>(
        &self,
        channel: &mut FramedChannel<S>,
    ) -> Result<AuthenticatedUser, HandshakeError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut state = HandshakeState::Start;
        let result = self.drive(channel, &mut state).await;

        match &result {
            Ok(user) => {
                advance(&mut state, HandshakeState::Authenticated);
                info!(
                    "[cm-03] {} authenticated{}",
                    user.user_id,
                    if user.registered { " (new registration)" } else { "" }
                );
            }
            Err(e) => {
                let from = state;
                advance(&mut state, HandshakeState::Rejected);
                warn!("[cm-03] handshake rejected in {} state: {}", from, e);
            }
        }
        debug_assert!(state.is_terminal());
        result
    }

    async fn drive<S>(
        &self,
        channel: &mut FramedChannel<S>,
        state: &mut HandshakeState,
    ) -> Result<AuthenticatedUser, HandshakeError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let claimed = match channel.recv().await? {
            HandshakeMessage::UserId(claimed) => claimed,
            other => return Err(unexpected("UserId", &other)),
        };
        let user_id = UserId::new(claimed)
            .map_err(|e| HandshakeError::InvalidCredentials(format!("bad user id: {}", e)))?;

        advance(state, HandshakeState::Lookup);
        let directory = self.directory.clone();
        let lookup = user_id.clone();
        let credential = off_runtime(move || directory.credential_for(lookup.as_str())).await?;

        let nonce = ChallengeNonce::generate();
        channel
            .send(&HandshakeMessage::Nonce(*nonce.as_bytes()))
            .await?;
        channel
            .send(&HandshakeMessage::IsNewUser(credential.is_none()))
            .await?;

        match credential {
            Some(credential) => {
                advance(state, HandshakeState::KnownUser);
                let signature = expect_signature(channel.recv().await?)?;
                let directory = self.directory.clone();
                let file_name = credential.certificate_file.clone();
                let certificate = off_runtime(move || directory.load_certificate(&file_name))
                    .await?
                    .map_err(|e| {
                        HandshakeError::InvalidCredentials(format!("no usable certificate: {}", e))
                    })?;
                self.check_proof(&certificate, nonce.as_bytes(), &signature)?;

                Ok(AuthenticatedUser {
                    user_id,
                    registered: false,
                })
            }
            None => {
                advance(state, HandshakeState::NewUser);
                let echoed = match channel.recv().await? {
                    HandshakeMessage::EchoedNonce(echoed) => echoed,
                    other => return Err(unexpected("EchoedNonce", &other)),
                };
                if !nonce.matches(&echoed) {
                    return Err(HandshakeError::InvalidCredentials(
                        "echoed nonce does not match".to_string(),
                    ));
                }

                let signature = expect_signature(channel.recv().await?)?;
                let der = match channel.recv().await? {
                    HandshakeMessage::Certificate(der) => der,
                    other => return Err(unexpected("Certificate", &other)),
                };
                let certificate = Certificate::from_der(der).map_err(|e| {
                    HandshakeError::InvalidCredentials(format!("bad certificate: {}", e))
                })?;
                self.check_proof(&certificate, &echoed, &signature)?;

                let directory = self.directory.clone();
                let new_user = user_id.clone();
                off_runtime(move || directory.register(new_user, &certificate)).await??;
                Ok(AuthenticatedUser {
                    user_id,
                    registered: true,
                })
            }
        }
    }

    /// Verify `signature` over `message` with the key in `certificate`.
    fn check_proof(
        &self,
        certificate: &Certificate,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), HandshakeError> {
        let public_key = certificate.public_key().map_err(|e| {
            HandshakeError::InvalidCredentials(format!("unusable certificate key: {}", e))
        })?;
        if self.verifier.verify(&public_key, message, signature) {
            Ok(())
        } else {
            Err(HandshakeError::InvalidCredentials(
                "signature does not verify".to_string(),
            ))
        }
    }
}

/// Run a store call on tokio's blocking pool.
async fn off_runtime<T, F>(call: F) -> Result<T, HandshakeError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| HandshakeError::StoreTask(e.to_string()))
}

fn advance(state: &mut HandshakeState, next: HandshakeState) {
    debug!("[cm-03] {} -> {}", state, next);
    *state = next;
}

fn unexpected(expected: &str, got: &HandshakeMessage) -> HandshakeError {
    HandshakeError::Protocol(format!("expected {}, got {}", expected, got.kind()))
}

fn expect_signature(message: HandshakeMessage) -> Result<Vec<u8>, HandshakeError> {
    match message {
        HandshakeMessage::Signature(signature) => Ok(signature),
        other => Err(unexpected("Signature", &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HandshakeClient;
    use cm_01_signature_verification::SignatureVerificationService;
    use cm_02_identity_store::{IdentityStore, StoreConfig};
    use shared_crypto::{Ed25519KeyPair, FileKey};
    use tempfile::TempDir;
    use tokio::io::DuplexStream;

    struct Fixture {
        _dir: TempDir,
        store: Arc<IdentityStore>,
        authenticator: Authenticator,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(
            IdentityStore::open(StoreConfig::in_dir(dir.path()), FileKey::generate()).unwrap(),
        );
        let authenticator = Authenticator::new(
            store.clone(),
            Arc::new(SignatureVerificationService::new()),
            HandshakeConfig::default(),
        );
        Fixture {
            _dir: dir,
            store,
            authenticator,
        }
    }

    async fn login(
        fixture: &Fixture,
        name: &str,
        keypair: &Ed25519KeyPair,
    ) -> (
        Result<AuthenticatedUser, HandshakeError>,
        Result<bool, HandshakeError>,
    ) {
        let (server_io, client_io) = tokio::io::duplex(64 * 1024);
        let user = UserId::new(name).unwrap();
        let server = fixture.authenticator.serve(server_io);
        let client = HandshakeClient::login(client_io, &user, keypair);
        tokio::join!(server, client)
    }

    /// Client side driven by hand: returns (nonce, is_new) after sending the id.
    async fn open_session(
        channel: &mut FramedChannel<DuplexStream>,
        name: &str,
    ) -> ([u8; 8], bool) {
        channel
            .send(&HandshakeMessage::UserId(name.into()))
            .await
            .unwrap();
        let nonce = match channel.recv().await.unwrap() {
            HandshakeMessage::Nonce(n) => n,
            other => panic!("unexpected {:?}", other),
        };
        let is_new = match channel.recv().await.unwrap() {
            HandshakeMessage::IsNewUser(b) => b,
            other => panic!("unexpected {:?}", other),
        };
        (nonce, is_new)
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let fixture = fixture();
        let keypair = Ed25519KeyPair::generate();

        let (server, client) = login(&fixture, "alice", &keypair).await;
        assert!(server.unwrap().registered);
        assert!(client.unwrap());

        let record = fixture.store.get_by_name("alice").unwrap();
        assert_eq!(record.balance, 200.0);
        assert_eq!(
            fixture.store.get_public_key("alice"),
            Some(keypair.public_key())
        );

        let (server, client) = login(&fixture, "alice", &keypair).await;
        assert!(!server.unwrap().registered);
        assert!(!client.unwrap());
        assert_eq!(fixture.store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_login_with_foreign_key_rejected() {
        let fixture = fixture();
        let (server, _) = login(&fixture, "alice", &Ed25519KeyPair::generate()).await;
        server.unwrap();

        let (server, client) = login(&fixture, "alice", &Ed25519KeyPair::generate()).await;
        assert!(matches!(server, Err(HandshakeError::InvalidCredentials(_))));
        assert!(matches!(client, Err(HandshakeError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_wrong_echo_persists_nothing() {
        let fixture = fixture();
        let (server_io, client_io) = tokio::io::duplex(64 * 1024);
        let keypair = Ed25519KeyPair::generate();

        let client = async {
            let mut channel = FramedChannel::new(client_io, None);
            let (nonce, is_new) = open_session(&mut channel, "mallory").await;
            assert!(is_new);

            let mut wrong = nonce;
            wrong[0] ^= 0x01;
            let cert = Certificate::self_signed(&keypair, "mallory").unwrap();
            // Signature is over the wrong echo, consistent with it.
            let _ = channel
                .send(&HandshakeMessage::EchoedNonce(wrong.to_vec()))
                .await;
            let _ = channel
                .send(&HandshakeMessage::Signature(keypair.sign(&wrong)))
                .await;
            let _ = channel
                .send(&HandshakeMessage::Certificate(cert.as_der().to_vec()))
                .await;
        };

        let (result, _) = tokio::join!(fixture.authenticator.authenticate(server_io), client);
        assert!(matches!(result, Err(HandshakeError::InvalidCredentials(_))));
        assert_eq!(fixture.store.user_count(), 0);
        assert!(fixture.store.credential_for("mallory").is_none());
    }

    #[tokio::test]
    async fn test_replayed_signature_rejected() {
        let fixture = fixture();
        let keypair = Ed25519KeyPair::generate();
        login(&fixture, "alice", &keypair).await.0.unwrap();

        // Capture a valid (nonce, signature) pair from one session.
        let (server_io, client_io) = tokio::io::duplex(64 * 1024);
        let captured = async {
            let mut channel = FramedChannel::new(client_io, None);
            let (nonce, is_new) = open_session(&mut channel, "alice").await;
            assert!(!is_new);
            let signature = keypair.sign(&nonce);
            channel
                .send(&HandshakeMessage::Signature(signature.clone()))
                .await
                .unwrap();
            signature
        };
        let (first, signature) =
            tokio::join!(fixture.authenticator.authenticate(server_io), captured);
        first.unwrap();

        // Replay it against a fresh challenge.
        let (server_io, client_io) = tokio::io::duplex(64 * 1024);
        let replay = async {
            let mut channel = FramedChannel::new(client_io, None);
            open_session(&mut channel, "alice").await;
            let _ = channel.send(&HandshakeMessage::Signature(signature)).await;
        };
        let (second, _) = tokio::join!(fixture.authenticator.authenticate(server_io), replay);
        assert!(matches!(second, Err(HandshakeError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_signature_not_matching_certificate_rejected() {
        let fixture = fixture();
        let (server_io, client_io) = tokio::io::duplex(64 * 1024);
        let signer = Ed25519KeyPair::generate();
        let other = Ed25519KeyPair::generate();

        let client = async {
            let mut channel = FramedChannel::new(client_io, None);
            let (nonce, _) = open_session(&mut channel, "trudy").await;
            let cert = Certificate::self_signed(&other, "trudy").unwrap();
            let _ = channel
                .send(&HandshakeMessage::EchoedNonce(nonce.to_vec()))
                .await;
            let _ = channel
                .send(&HandshakeMessage::Signature(signer.sign(&nonce)))
                .await;
            let _ = channel
                .send(&HandshakeMessage::Certificate(cert.as_der().to_vec()))
                .await;
        };

        let (result, _) = tokio::join!(fixture.authenticator.authenticate(server_io), client);
        assert!(matches!(result, Err(HandshakeError::InvalidCredentials(_))));
        assert_eq!(fixture.store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_user_id_rejected() {
        let fixture = fixture();
        let (server_io, client_io) = tokio::io::duplex(1024);
        let client = async {
            let mut channel = FramedChannel::new(client_io, None);
            channel
                .send(&HandshakeMessage::UserId("bad:name".into()))
                .await
                .unwrap();
        };
        let (result, _) = tokio::join!(fixture.authenticator.authenticate(server_io), client);
        assert!(matches!(result, Err(HandshakeError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_out_of_order_frame_is_protocol_error() {
        let fixture = fixture();
        let (server_io, client_io) = tokio::io::duplex(1024);
        let client = async {
            let mut channel = FramedChannel::new(client_io, None);
            channel
                .send(&HandshakeMessage::Signature(vec![0u8; 64]))
                .await
                .unwrap();
        };
        let (result, _) = tokio::join!(fixture.authenticator.authenticate(server_io), client);
        assert!(matches!(result, Err(HandshakeError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_dropped_connection_leaves_no_state() {
        let fixture = fixture();
        let (server_io, client_io) = tokio::io::duplex(1024);
        let client = async move {
            let mut channel = FramedChannel::new(client_io, None);
            let (nonce, _) = open_session(&mut channel, "quinn").await;
            let _ = channel
                .send(&HandshakeMessage::EchoedNonce(nonce.to_vec()))
                .await;
            drop(channel);
        };
        let (result, _) = tokio::join!(fixture.authenticator.authenticate(server_io), client);
        assert!(matches!(result, Err(HandshakeError::Transport(_))));
        assert_eq!(fixture.store.user_count(), 0);
    }

    /// Directory whose `register` parks its thread until another task on
    /// the runtime releases it.
    struct GatedDirectory {
        inner: Arc<IdentityStore>,
        entered: parking_lot::Mutex<Option<tokio::sync::oneshot::Sender<()>>>,
        release: parking_lot::Mutex<std::sync::mpsc::Receiver<()>>,
    }

    impl IdentityDirectory for GatedDirectory {
        fn credential_for(&self, user_id: &str) -> Option<cm_02_identity_store::CredentialLine> {
            self.inner.credential_for(user_id)
        }

        fn load_certificate(
            &self,
            file_name: &str,
        ) -> Result<Certificate, cm_02_identity_store::StoreError> {
            self.inner.load_certificate(file_name)
        }

        fn register(
            &self,
            user_id: UserId,
            certificate: &Certificate,
        ) -> Result<cm_02_identity_store::IdentityRecord, cm_02_identity_store::StoreError> {
            if let Some(entered) = self.entered.lock().take() {
                let _ = entered.send(());
            }
            self.release
                .lock()
                .recv_timeout(std::time::Duration::from_secs(2))
                .map_err(|_| cm_02_identity_store::StoreError::Io {
                    path: "gate".into(),
                    source: std::io::Error::new(std::io::ErrorKind::TimedOut, "runtime starved"),
                })?;
            self.inner.register(user_id, certificate)
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_registration_does_not_block_runtime_thread() {
        let fixture = fixture();
        let (entered_tx, entered_rx) = tokio::sync::oneshot::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel();
        let authenticator = Authenticator::new(
            Arc::new(GatedDirectory {
                inner: fixture.store.clone(),
                entered: parking_lot::Mutex::new(Some(entered_tx)),
                release: parking_lot::Mutex::new(release_rx),
            }),
            Arc::new(SignatureVerificationService::new()),
            HandshakeConfig::default(),
        );

        // Only runs if the single runtime thread is free while register waits.
        let releaser = tokio::spawn(async move {
            if entered_rx.await.is_ok() {
                let _ = release_tx.send(());
            }
        });

        let keypair = Ed25519KeyPair::generate();
        let user = UserId::new("carol").unwrap();
        let (server_io, client_io) = tokio::io::duplex(64 * 1024);
        let (server, client) = tokio::join!(
            authenticator.serve(server_io),
            HandshakeClient::login(client_io, &user, &keypair)
        );

        assert!(server.unwrap().registered);
        assert!(client.unwrap());
        assert_eq!(fixture.store.user_count(), 1);
        releaser.await.unwrap();
    }

    #[test]
    fn test_duplicate_registration_maps_to_invalid_credentials() {
        let user = UserId::new("alice").unwrap();
        let error = HandshakeError::from(cm_02_identity_store::StoreError::AlreadyRegistered(user));
        assert!(matches!(error, HandshakeError::InvalidCredentials(_)));
    }
}
