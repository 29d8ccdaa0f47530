//! Ports of the authentication handshake.

pub mod outbound;

pub use outbound::IdentityDirectory;
