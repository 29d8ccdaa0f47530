//! # Authentication Handshake (CM-03)
//!
//! Nonce challenge-response over certificates, with trust-on-first-use
//! registration.
//!
//! ## Flow
//!
//! - **Known user**: server sends an 8-byte nonce, client signs it, server
//!   checks the signature with the key in the stored certificate.
//! - **New user**: client echoes the nonce, signs it and sends a self-issued
//!   certificate; server checks echo and signature, then registers.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): messages, states, config, errors
//! - **Ports Layer** (`ports/`): `IdentityDirectory`
//! - **Adapters Layer** (`adapters/`): frame channel, `IdentityStore` binding
//! - **Service Layer** (`service.rs`, `client.rs`): both halves

pub mod adapters;
pub mod client;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::framing::{FramedChannel, MAX_FRAME_LEN};
pub use client::HandshakeClient;
pub use domain::entities::{AuthenticatedUser, HandshakeConfig, DEFAULT_READ_TIMEOUT};
pub use domain::errors::HandshakeError;
pub use domain::messages::{HandshakeMessage, Verdict};
pub use domain::state::HandshakeState;
pub use ports::outbound::IdentityDirectory;
pub use service::Authenticator;
