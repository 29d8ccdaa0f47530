//! Handshake error types.

use cm_02_identity_store::StoreError;
use thiserror::Error;

/// Why a handshake did not end in `Authenticated`.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// The client failed to prove its identity. Reported to the client.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Unexpected, oversized or undecodable frame.
    #[error("Protocol violation: {0}")]
    Protocol(String),

    /// The connection failed or closed mid-handshake.
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// No frame arrived within the configured read timeout.
    #[error("Timed out waiting for the peer")]
    Timeout,

    /// The store could not persist a registration.
    #[error("Storage error: {0}")]
    Storage(#[source] StoreError),

    /// A blocking store call panicked or was cancelled.
    #[error("Store task failed: {0}")]
    StoreTask(String),
}

impl HandshakeError {
    /// Text safe to send back in a rejection verdict.
    pub fn client_reason(&self) -> String {
        match self {
            HandshakeError::InvalidCredentials(reason) => reason.clone(),
            HandshakeError::Protocol(reason) => format!("protocol violation: {}", reason),
            HandshakeError::Transport(_) => "connection error".to_string(),
            HandshakeError::Timeout => "timed out".to_string(),
            HandshakeError::Storage(_) | HandshakeError::StoreTask(_) => {
                "internal error".to_string()
            }
        }
    }
}

impl From<StoreError> for HandshakeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AlreadyRegistered(user) | StoreError::UserExists(user) => {
                HandshakeError::InvalidCredentials(format!("{} is already registered", user))
            }
            other => HandshakeError::Storage(other),
        }
    }
}
