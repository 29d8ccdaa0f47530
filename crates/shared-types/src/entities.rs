//! # Core Domain Entities
//!
//! Vocabulary shared by the identity store, the handshake and the
//! transaction record.
//!
//! ## Clusters
//!
//! - **Identity**: `UserId`
//! - **Challenge**: `ChallengeNonce`
//! - **Market**: `ItemId`, `TransactionKind`

use crate::errors::IdentifierError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use subtle::ConstantTimeEq;

/// Maximum length of a user identifier in bytes.
pub const MAX_USER_ID_LEN: usize = 64;

/// Length of a handshake challenge in bytes.
pub const NONCE_LEN: usize = 8;

// =============================================================================
// IDENTITY
// =============================================================================

/// Case-sensitive user identifier, the primary key of the identity catalog.
///
/// The identifier ends up inside a space-separated catalog line, a
/// `user:file` credential line and a certificate file name, so it may not
/// contain whitespace, `:`, path separators or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and wrap an identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        if value.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if value.len() > MAX_USER_ID_LEN {
            return Err(IdentifierError::TooLong {
                len: value.len(),
                max: MAX_USER_ID_LEN,
            });
        }
        if let Some(c) = value
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || matches!(c, ':' | '/' | '\\'))
        {
            return Err(IdentifierError::ForbiddenCharacter(c));
        }
        Ok(Self(value))
    }

    /// Borrow as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UserId {
    type Error = IdentifierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets `HashMap<UserId, _>` be queried with a plain `&str`.
impl Borrow<str> for UserId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// CHALLENGE
// =============================================================================

/// Single-use random challenge sent to a connecting client.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeNonce([u8; NONCE_LEN]);

impl ChallengeNonce {
    /// Draw a fresh nonce from the operating system CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_LEN];
        rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut bytes);
        Self(bytes)
    }

    /// Wrap known bytes.
    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes (the exact message a client signs).
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }

    /// Constant-time comparison against bytes echoed by a client.
    ///
    /// A length mismatch is simply `false`.
    pub fn matches(&self, echoed: &[u8]) -> bool {
        echoed.len() == NONCE_LEN && bool::from(self.0.as_slice().ct_eq(echoed))
    }
}

impl fmt::Debug for ChallengeNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChallengeNonce({})", hex::encode(self.0))
    }
}

// =============================================================================
// MARKET
// =============================================================================

/// Identifier of a catalog item. Opaque to this core.
pub type ItemId = String;

/// Direction of a market transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// The user acquires units.
    Buy,
    /// The user offers units.
    Sell,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Buy => f.write_str("buy"),
            TransactionKind::Sell => f.write_str("sell"),
        }
    }
}
