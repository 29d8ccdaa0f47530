//! # Signature Verification (CM-01)
//!
//! Checks user signatures for the authentication handshake and for signed
//! market transactions.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure cryptographic logic, no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for the inbound interface
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Security Notes
//!
//! - **Failure is a value**: a bad signature, a truncated blob or an unusable
//!   key all produce `false`. Nothing here panics or returns `Err` on
//!   adversarial input.
//! - **Strict Ed25519**: malleable encodings are rejected.

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::entities::{VerificationRequest, VerificationResult};
pub use domain::errors::SignatureError;
pub use domain::verifier::{verify, verify_detailed, Ed25519Verifier};
pub use ports::inbound::SignatureVerificationApi;
pub use service::SignatureVerificationService;
