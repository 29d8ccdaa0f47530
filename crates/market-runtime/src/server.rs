//! # Market Server
//!
//! Opens the identity store, binds the listener and runs one handshake per
//! accepted connection on its own task. The verdict is the last frame a
//! connection sees from this runtime.

use crate::container::RuntimeConfig;
use anyhow::{Context, Result};
use cm_01_signature_verification::SignatureVerificationService;
use cm_02_identity_store::IdentityStore;
use cm_03_auth_handshake::{Authenticator, HandshakeError};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

/// The running marketplace front door.
pub struct MarketRuntime {
    store: Arc<IdentityStore>,
    authenticator: Authenticator,
    listener: TcpListener,
}

impl MarketRuntime {
    /// Open the store and bind the listener.
    pub async fn bind(config: &RuntimeConfig) -> Result<Self> {
        let store_config = config.store_config();
        let store = Arc::new(
            IdentityStore::open(store_config.clone(), config.security.file_key.clone())
                .with_context(|| {
                    format!(
                        "Failed to open identity store at {}",
                        store_config.data_dir.display()
                    )
                })?,
        );

        let authenticator = Authenticator::new(
            store.clone(),
            Arc::new(SignatureVerificationService::new()),
            config.handshake_config(),
        );

        let listener = TcpListener::bind(config.network.listen_addr)
            .await
            .with_context(|| format!("Failed to bind {}", config.network.listen_addr))?;

        Ok(Self {
            store,
            authenticator,
            listener,
        })
    }

    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Shared handle to the identity store.
    pub fn store(&self) -> Arc<IdentityStore> {
        self.store.clone()
    }

    /// Accept connections until `shutdown` resolves.
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        info!(
            "Accepting connections on {} ({} registered users)",
            self.local_addr()?,
            self.store.user_count()
        );

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((socket, peer)) => self.spawn_session(socket, peer),
                    Err(e) => error!("Accept failed: {}", e),
                }
            }
        }
    }

    fn spawn_session(&self, socket: TcpStream, peer: SocketAddr) {
        let authenticator = self.authenticator.clone();
        tokio::spawn(async move {
            debug!("Connection from {}", peer);
            match authenticator.serve(socket).await {
                Ok(user) => info!("{} logged in as {}", peer, user.user_id),
                Err(HandshakeError::InvalidCredentials(reason)) => {
                    warn!("{} rejected: {}", peer, reason)
                }
                Err(e) => warn!("{} handshake failed: {}", peer, e),
            }
        });
    }
}
