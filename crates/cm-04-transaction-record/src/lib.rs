//! # Transaction Record (CM-04)
//!
//! Signed buy/sell orders that any holder can check against the signer's
//! certificate on file.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `TransactionRecord`, canonical message
//! - **Ports Layer** (`ports/`): `SignerKeyDirectory`
//! - **Adapters Layer** (`adapters/`): `IdentityStore` binding

pub mod adapters;
pub mod domain;
pub mod ports;

pub use domain::entities::{canonical_message, price_text, TransactionRecord};
pub use domain::errors::TransactionError;
pub use ports::outbound::SignerKeyDirectory;
