//! # Identity Record Store (CM-02)
//!
//! Persistent catalog of marketplace users, the credential lines that bind
//! each user to a certificate, and the certificate files themselves.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): records, line codec, layout, errors
//! - **Ports Layer** (`ports/`): cipher and integrity-stamp traits
//! - **Adapters Layer** (`adapters/`): line files, HMAC stamps, PEM vault,
//!   directory lock
//! - **Service Layer** (`service.rs`): `IdentityStore`
//!
//! ## On-disk Layout
//!
//! ```text
//! <data_dir>/user_catalog.txt        sealed `user balance {item=[a, b]}` lines
//! <data_dir>/user_catalog.txt.mac    hex HMAC-SHA256 of the file
//! <data_dir>/user_credentials.txt    sealed `user:pubkey_user.cer` lines
//! <data_dir>/user_credentials.txt.mac
//! <data_dir>/LOCK
//! <cert_dir>/pubkey_<user>.cer       PEM certificate
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::config::StoreConfig;
pub use domain::entities::{
    certificate_file_name, Availability, CredentialLine, IdentityRecord, STARTING_BALANCE,
};
pub use domain::errors::StoreError;
pub use ports::outbound::{IntegrityStamp, LineCipher, StampStatus};
pub use service::IdentityStore;
