//! Handshake configuration and outcome.

use shared_types::UserId;
use std::time::Duration;

/// Default per-read timeout.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Server-side handshake settings.
#[derive(Debug, Clone)]
pub struct HandshakeConfig {
    /// Upper bound on each frame read. `None` waits forever.
    pub read_timeout: Option<Duration>,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
        }
    }
}

/// A client that proved its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    /// True when this handshake created the user.
    pub registered: bool,
}
