//! Transaction construction errors.

use thiserror::Error;

/// Why a transaction record could not be built.
#[derive(Debug, Error, PartialEq)]
pub enum TransactionError {
    /// Zero units.
    #[error("Units must be positive")]
    ZeroUnits,

    /// Negative, NaN, infinite or out-of-range unit value.
    #[error("Unit value {0} must be a finite, non-negative decimal price")]
    InvalidUnitValue(f64),

    /// Empty item identifier.
    #[error("Item identifier is empty")]
    EmptyItem,

    /// Claimed signer is not a valid identifier.
    #[error("Invalid user id: {0}")]
    InvalidUserId(#[from] shared_types::IdentifierError),
}
