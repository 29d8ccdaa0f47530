//! Handshake states.
//!
//! ```text
//! Start → Lookup → KnownUser ─┬→ Authenticated
//!                → NewUser  ──┴→ Rejected
//! ```

use std::fmt;

/// Where a server-side handshake currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Waiting for the claimed identity.
    Start,
    /// Checking the credential file.
    Lookup,
    /// Credential found; expecting a signature.
    KnownUser,
    /// No credential; expecting echo, signature and certificate.
    NewUser,
    /// Proof accepted.
    Authenticated,
    /// Proof refused or the session broke.
    Rejected,
}

impl HandshakeState {
    /// True for `Authenticated` and `Rejected`.
    pub fn is_terminal(self) -> bool {
        matches!(self, HandshakeState::Authenticated | HandshakeState::Rejected)
    }
}

impl fmt::Display for HandshakeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandshakeState::Start => "start",
            HandshakeState::Lookup => "lookup",
            HandshakeState::KnownUser => "known-user",
            HandshakeState::NewUser => "new-user",
            HandshakeState::Authenticated => "authenticated",
            HandshakeState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}
