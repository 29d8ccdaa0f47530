//! # Handshake Client
//!
//! Client half of the handshake: answers the challenge with the user's
//! keypair and, on first contact, registers a freshly issued self-signed
//! certificate.

use crate::adapters::framing::FramedChannel;
use crate::domain::errors::HandshakeError;
use crate::domain::messages::HandshakeMessage;
use shared_crypto::{Certificate, Ed25519KeyPair};
use shared_types::UserId;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

/// Client-side handshake driver.
pub struct HandshakeClient;

impl HandshakeClient {
    /// Log in as `user_id`, registering on first contact.
    ///
    /// Returns `true` when the server registered the user during this call.
    pub async fn login<S>(
        stream: S,
        user_id: &UserId,
        keypair: &Ed25519KeyPair,
    ) -> Result<bool, HandshakeError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        Self::login_with_timeout(stream, user_id, keypair, None).await
    }

    /// [`HandshakeClient::login`] with a per-read timeout.
    pub async fn login_with_timeout<S>(
        stream: S,
        user_id: &UserId,
        keypair: &Ed25519KeyPair,
        read_timeout: Option<Duration>,
    ) -> Result<bool, HandshakeError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut channel = FramedChannel::new(stream, read_timeout);
        channel
            .send(&HandshakeMessage::UserId(user_id.to_string()))
            .await?;

        let nonce = match channel.recv().await? {
            HandshakeMessage::Nonce(nonce) => nonce,
            other => return Err(unexpected_reply(other)),
        };
        let is_new = match channel.recv().await? {
            HandshakeMessage::IsNewUser(is_new) => is_new,
            other => return Err(unexpected_reply(other)),
        };
        debug!(
            "[cm-03] challenge received for {} ({})",
            user_id,
            if is_new { "registering" } else { "known" }
        );

        let signature = keypair.sign(&nonce);
        if is_new {
            let certificate = Certificate::self_signed(keypair, user_id.as_str())
                .map_err(|e| HandshakeError::Protocol(format!("cannot issue certificate: {}", e)))?;
            channel
                .send(&HandshakeMessage::EchoedNonce(nonce.to_vec()))
                .await?;
            channel.send(&HandshakeMessage::Signature(signature)).await?;
            channel
                .send(&HandshakeMessage::Certificate(certificate.as_der().to_vec()))
                .await?;
        } else {
            channel.send(&HandshakeMessage::Signature(signature)).await?;
        }

        match channel.recv().await? {
            HandshakeMessage::Verdict(verdict) if verdict.accepted => Ok(is_new),
            HandshakeMessage::Verdict(verdict) => Err(HandshakeError::InvalidCredentials(
                verdict.reason.unwrap_or_else(|| "rejected".to_string()),
            )),
            other => Err(unexpected_reply(other)),
        }
    }
}

fn unexpected_reply(message: HandshakeMessage) -> HandshakeError {
    match message {
        HandshakeMessage::Verdict(verdict) if !verdict.accepted => {
            HandshakeError::InvalidCredentials(
                verdict.reason.unwrap_or_else(|| "rejected".to_string()),
            )
        }
        other => HandshakeError::Protocol(format!("unexpected {} from server", other.kind())),
    }
}
