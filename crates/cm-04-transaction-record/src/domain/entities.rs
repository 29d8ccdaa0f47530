//! # Transaction Record
//!
//! An immutable buy/sell order signed by the user who placed it. The
//! signature covers
//!
//! ```text
//! item_id ‖ units ‖ price_text(unit_value) ‖ user_id
//! ```
//!
//! as UTF-8 with no separators. The price is rounded half-up from the
//! shortest decimal form of the `f64` (`2.675` signs as `2.68`), matching
//! what clients of the market have always signed. Validity is never cached: every
//! [`TransactionRecord::validate`] call looks up the signer's current key.

use super::errors::TransactionError;
use crate::ports::outbound::SignerKeyDirectory;
use cm_01_signature_verification::SignatureVerificationApi;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use shared_crypto::Ed25519KeyPair;
use shared_types::{ItemId, TransactionKind, UserId};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A signed market order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTransaction")]
pub struct TransactionRecord {
    kind: TransactionKind,
    item_id: ItemId,
    units: u32,
    unit_value: f64,
    user_id: UserId,
    signature: Vec<u8>,
}

/// Unchecked wire form; deserialization goes through `new`.
#[derive(Deserialize)]
struct RawTransaction {
    kind: TransactionKind,
    item_id: ItemId,
    units: u32,
    unit_value: f64,
    user_id: UserId,
    signature: Vec<u8>,
}

impl TryFrom<RawTransaction> for TransactionRecord {
    type Error = TransactionError;

    fn try_from(raw: RawTransaction) -> Result<Self, Self::Error> {
        Self::new(
            raw.kind,
            raw.item_id,
            raw.units,
            raw.unit_value,
            raw.user_id,
            raw.signature,
        )
    }
}

impl TransactionRecord {
    /// Build a record around a signature produced elsewhere.
    ///
    /// # Errors
    ///
    /// Zero units, an empty item, or a unit value that is negative, not
    /// finite, or too large to render as a decimal price.
    pub fn new(
        kind: TransactionKind,
        item_id: impl Into<ItemId>,
        units: u32,
        unit_value: f64,
        user_id: UserId,
        signature: Vec<u8>,
    ) -> Result<Self, TransactionError> {
        let item_id = item_id.into();
        if item_id.is_empty() {
            return Err(TransactionError::EmptyItem);
        }
        if units == 0 {
            return Err(TransactionError::ZeroUnits);
        }
        if !unit_value.is_finite() || unit_value < 0.0 || price_text(unit_value).is_none() {
            return Err(TransactionError::InvalidUnitValue(unit_value));
        }

        Ok(Self {
            kind,
            item_id,
            units,
            unit_value,
            user_id,
            signature,
        })
    }

    /// Build and sign a record with the user's keypair (client side).
    pub fn signed(
        kind: TransactionKind,
        item_id: impl Into<ItemId>,
        units: u32,
        unit_value: f64,
        user_id: UserId,
        keypair: &Ed25519KeyPair,
    ) -> Result<Self, TransactionError> {
        let mut record = Self::new(kind, item_id, units, unit_value, user_id, Vec::new())?;
        record.signature = keypair.sign(&record.canonical_message());
        Ok(record)
    }

    /// The exact bytes the signature covers.
    pub fn canonical_message(&self) -> Vec<u8> {
        canonical_message(&self.item_id, self.units, self.unit_value, &self.user_id)
    }

    /// True iff the signature verifies under the signer's current key.
    ///
    /// An unknown signer or missing certificate is simply invalid.
    pub fn validate(
        &self,
        directory: &dyn SignerKeyDirectory,
        verifier: &dyn SignatureVerificationApi,
    ) -> bool {
        let Some(public_key) = directory.signer_key(&self.user_id) else {
            debug!("[cm-04] no key on file for {}", self.user_id);
            return false;
        };
        verifier.verify(&public_key, &self.canonical_message(), &self.signature)
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn units(&self) -> u32 {
        self.units
    }

    pub fn unit_value(&self) -> f64 {
        self.unit_value
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

/// `item_id ‖ units ‖ unit_value (2 decimals) ‖ user_id`, UTF-8.
pub fn canonical_message(item_id: &str, units: u32, unit_value: f64, user_id: &UserId) -> Vec<u8> {
    // Out-of-range values never reach here through `TransactionRecord::new`.
    let price = price_text(unit_value).unwrap_or_else(|| format!("{:.2}", unit_value));
    format!("{}{}{}{}", item_id, units, price, user_id).into_bytes()
}

/// Two-decimal rendering of a price.
///
/// Starts from the shortest decimal string that round-trips to `unit_value`
/// and rounds ties away from zero, so `0.125` gives `"0.13"` where plain
/// `{:.2}` on the binary value would give `"0.12"`. `None` when the value
/// does not fit a 96-bit decimal.
pub fn price_text(unit_value: f64) -> Option<String> {
    let shortest = Decimal::from_str(&unit_value.to_string()).ok()?;
    let rounded = shortest.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    Some(format!("{:.2}", rounded))
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Operation: {}\r\nItem: {}\r\nUnits: {}\r\nUnit value: {}\r\nUser: {}\r\n",
            self.kind,
            self.item_id,
            self.units,
            price_text(self.unit_value).unwrap_or_else(|| format!("{:.2}", self.unit_value)),
            self.user_id
        )
    }
}
