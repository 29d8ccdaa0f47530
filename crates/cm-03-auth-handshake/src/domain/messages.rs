//! # Wire Messages
//!
//! One [`HandshakeMessage`] per frame, bincode encoded. Order of a session:
//!
//! ```text
//! client → server  UserId
//! server → client  Nonce, IsNewUser
//! client → server  known: Signature
//!                  new:   EchoedNonce, Signature, Certificate
//! server → client  Verdict
//! ```

use serde::{Deserialize, Serialize};
use shared_types::NONCE_LEN;

/// Final answer sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the client is now authenticated.
    pub accepted: bool,
    /// Rejection reason.
    pub reason: Option<String>,
}

impl Verdict {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            reason: Some(reason.into()),
        }
    }
}

/// A single handshake frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandshakeMessage {
    /// Claimed identity.
    UserId(String),
    /// Fresh challenge.
    Nonce([u8; NONCE_LEN]),
    /// Whether the server has no credential for the claimed identity.
    IsNewUser(bool),
    /// New users send the challenge back verbatim.
    EchoedNonce(Vec<u8>),
    /// Ed25519 signature over the challenge.
    Signature(Vec<u8>),
    /// Self-issued X.509 certificate, DER.
    Certificate(Vec<u8>),
    /// Outcome.
    Verdict(Verdict),
}

impl HandshakeMessage {
    /// Variant name, for protocol errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            HandshakeMessage::UserId(_) => "UserId",
            HandshakeMessage::Nonce(_) => "Nonce",
            HandshakeMessage::IsNewUser(_) => "IsNewUser",
            HandshakeMessage::EchoedNonce(_) => "EchoedNonce",
            HandshakeMessage::Signature(_) => "Signature",
            HandshakeMessage::Certificate(_) => "Certificate",
            HandshakeMessage::Verdict(_) => "Verdict",
        }
    }
}
