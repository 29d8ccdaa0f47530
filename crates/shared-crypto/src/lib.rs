//! # Shared Crypto - Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | XChaCha20-Poly1305 | Per-line encryption of store files |
//! | `hashing` | HMAC-SHA256 | Integrity stamps for store files |
//! | `signatures` | Ed25519 | User identity keys, nonce and transaction signatures |
//! | `certificate` | X.509 / PEM | Carrying a user's public key |
//!
//! ## Security Properties
//!
//! - **XChaCha20**: 192-bit random nonce per sealed line
//! - **Ed25519**: deterministic signing, strict verification
//! - Key material is zeroized on drop and never printed by `Debug`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod certificate;
pub mod errors;
pub mod hashing;
pub mod signatures;
pub mod symmetric;

// Re-exports
pub use certificate::Certificate;
pub use errors::CryptoError;
pub use hashing::{stamp_digest, verify_stamp};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey};
pub use symmetric::{cipher_line, open_line, seal_line, CipherMode, FileKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
