//! # Line Codec
//!
//! Plaintext form of catalog and credential lines (before sealing).
//!
//! ```text
//! catalog:    alice 200.0 {cork=[red, 1998], glass=[]}
//! credential: alice:pubkey_alice.cer
//! ```
//!
//! Entries and attributes are separated by `", "`. Encoding refuses any
//! content that would make the decode ambiguous, so every line this module
//! writes reads back to the same record.

use super::entities::{Availability, CredentialLine, IdentityRecord};
use super::errors::StoreError;
use shared_types::UserId;

const SEPARATOR: &str = ", ";

/// Characters never allowed inside an item identifier.
const ITEM_FORBIDDEN: &[char] = &['=', ',', '[', ']', '{', '}'];

/// Characters never allowed inside an attribute.
const ATTRIBUTE_FORBIDDEN: &[char] = &[',', '[', ']', '{', '}'];

fn check_token(kind: &str, token: &str, forbidden: &[char]) -> Result<(), StoreError> {
    if token.is_empty() {
        return Err(StoreError::Unencodable {
            reason: format!("empty {}", kind),
        });
    }
    if let Some(c) = token
        .chars()
        .find(|c| forbidden.contains(c) || c.is_control())
    {
        return Err(StoreError::Unencodable {
            reason: format!("{} {:?} contains {:?}", kind, token, c),
        });
    }
    Ok(())
}

/// Render a record as a catalog line.
pub fn encode_record(record: &IdentityRecord) -> Result<String, StoreError> {
    if !record.balance.is_finite() {
        return Err(StoreError::Unencodable {
            reason: format!("balance {} is not finite", record.balance),
        });
    }

    let mut entries = Vec::with_capacity(record.availability.len());
    for (item, attributes) in &record.availability {
        check_token("item", item, ITEM_FORBIDDEN)?;
        for attribute in attributes {
            check_token("attribute", attribute, ATTRIBUTE_FORBIDDEN)?;
        }
        entries.push(format!("{}=[{}]", item, attributes.join(SEPARATOR)));
    }

    Ok(format!(
        "{} {:?} {{{}}}",
        record.user_id(),
        record.balance,
        entries.join(SEPARATOR)
    ))
}

/// Split on `", "` where bracket depth is zero.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'[' => depth += 1,
            b']' => depth = depth.saturating_sub(1),
            b',' if depth == 0 && bytes.get(i + 1) == Some(&b' ') => {
                parts.push(&body[start..i]);
                start = i + SEPARATOR.len();
                i = start;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&body[start..]);
    parts
}

fn decode_availability(map: &str) -> Result<Availability, StoreError> {
    let body = map
        .strip_prefix('{')
        .and_then(|m| m.strip_suffix('}'))
        .ok_or_else(|| StoreError::malformed(format!("availability {:?} is not braced", map)))?;

    let mut availability = Availability::new();
    if body.is_empty() {
        return Ok(availability);
    }

    for entry in split_top_level(body) {
        let (item, list) = entry
            .split_once('=')
            .ok_or_else(|| StoreError::malformed(format!("entry {:?} has no '='", entry)))?;
        let list = list
            .strip_prefix('[')
            .and_then(|l| l.strip_suffix(']'))
            .ok_or_else(|| StoreError::malformed(format!("entry {:?} has no list", entry)))?;
        if item.is_empty() {
            return Err(StoreError::malformed("empty item identifier"));
        }

        let attributes = if list.is_empty() {
            Vec::new()
        } else {
            list.split(SEPARATOR).map(str::to_owned).collect()
        };
        if availability.insert(item.to_owned(), attributes).is_some() {
            return Err(StoreError::malformed(format!("item {:?} listed twice", item)));
        }
    }
    Ok(availability)
}

/// Parse a catalog line.
pub fn decode_record(line: &str) -> Result<IdentityRecord, StoreError> {
    let mut fields = line.splitn(3, ' ');
    let (user, balance, map) = match (fields.next(), fields.next(), fields.next()) {
        (Some(u), Some(b), Some(m)) => (u, b, m),
        _ => return Err(StoreError::malformed("expected `user balance {..}`")),
    };

    let user_id = UserId::new(user)?;
    let balance: f64 = balance
        .parse()
        .map_err(|_| StoreError::malformed(format!("balance {:?} is not a number", balance)))?;
    if !balance.is_finite() {
        return Err(StoreError::malformed("balance is not finite"));
    }
    let availability = decode_availability(map)?;

    Ok(IdentityRecord::with_state(user_id, balance, availability))
}

/// Render a credential line.
pub fn encode_credential(credential: &CredentialLine) -> String {
    format!("{}:{}", credential.user_id, credential.certificate_file)
}

/// Parse a credential line. The identifier ends at the first `:`.
pub fn decode_credential(line: &str) -> Result<CredentialLine, StoreError> {
    let (user, file) = line
        .split_once(':')
        .ok_or_else(|| StoreError::malformed("credential line has no ':'"))?;
    if file.is_empty() || file.contains(['/', '\\']) {
        return Err(StoreError::malformed(format!(
            "certificate file {:?} is not a plain file name",
            file
        )));
    }
    Ok(CredentialLine {
        user_id: UserId::new(user)?,
        certificate_file: file.to_owned(),
    })
}
