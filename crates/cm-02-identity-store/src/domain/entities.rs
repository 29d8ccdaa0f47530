//! # Domain Entities
//!
//! The identity catalog's records and the credential lines that map a user
//! to their certificate file.

use shared_types::UserId;
use std::collections::BTreeMap;

/// Credit granted to every newly registered user.
pub const STARTING_BALANCE: f64 = 200.0;

/// Item identifier → free-form attribute list. Ordered so that a record
/// always serializes to the same line.
pub type Availability = BTreeMap<String, Vec<String>>;

/// File name of the certificate stored for `user_id`.
pub fn certificate_file_name(user_id: &UserId) -> String {
    format!("pubkey_{}.cer", user_id)
}

/// The persisted profile for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityRecord {
    user_id: UserId,
    /// Credit balance, non-negative by convention.
    pub balance: f64,
    /// Items this user offers and their attributes.
    pub availability: Availability,
    certificate_ref: String,
}

impl IdentityRecord {
    /// A record for a freshly registered user: starting balance, nothing
    /// offered.
    pub fn new(user_id: UserId) -> Self {
        Self::with_state(user_id, STARTING_BALANCE, Availability::new())
    }

    /// A record with explicit balance and availability (used when loading).
    pub fn with_state(user_id: UserId, balance: f64, availability: Availability) -> Self {
        let certificate_ref = certificate_file_name(&user_id);
        Self {
            user_id,
            balance,
            availability,
            certificate_ref,
        }
    }

    /// Primary key; immutable once created.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// File name of this user's certificate in the certificate directory.
    pub fn certificate_ref(&self) -> &str {
        &self.certificate_ref
    }
}

/// `user_id:certificate_file_name`, one per registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialLine {
    /// Registered user.
    pub user_id: UserId,
    /// Certificate file name within the certificate directory.
    pub certificate_file: String,
}

impl CredentialLine {
    /// Credential for `user_id` pointing at its well-known certificate file.
    pub fn for_user(user_id: UserId) -> Self {
        let certificate_file = certificate_file_name(&user_id);
        Self {
            user_id,
            certificate_file,
        }
    }
}
