//! # Keyed Digests
//!
//! HMAC-SHA256 over whole files, used as the integrity stamp that accompanies
//! every encrypted store file.

use crate::symmetric::FileKey;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 output (256-bit).
pub type Digest = [u8; 32];

/// Domain separation so the stamp key never doubles as a cipher key.
const STAMP_CONTEXT: &[u8] = b"cellar-market/integrity-stamp/v1";

fn keyed(key: &FileKey) -> HmacSha256 {
    // HMAC accepts keys of any length, so `new_from_slice` cannot fail here.
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts any key length"));
    mac.update(STAMP_CONTEXT);
    mac
}

/// Compute the stamp for `data`.
pub fn stamp_digest(key: &FileKey, data: &[u8]) -> Digest {
    let mut mac = keyed(key);
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Constant-time check of `data` against a previously computed stamp.
pub fn verify_stamp(key: &FileKey, data: &[u8], expected: &[u8]) -> bool {
    let mut mac = keyed(key);
    mac.update(data);
    mac.verify_slice(expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_deterministic() {
        let key = FileKey::from_bytes([3u8; 32]);
        assert_eq!(stamp_digest(&key, b"abc"), stamp_digest(&key, b"abc"));
    }

    #[test]
    fn test_stamp_detects_change() {
        let key = FileKey::from_bytes([3u8; 32]);
        let stamp = stamp_digest(&key, b"line one\r\n");

        assert!(verify_stamp(&key, b"line one\r\n", &stamp));
        assert!(!verify_stamp(&key, b"line one\r\nline two\r\n", &stamp));
        assert!(!verify_stamp(&key, b"", &stamp));
    }

    #[test]
    fn test_stamp_depends_on_key() {
        let a = FileKey::from_bytes([1u8; 32]);
        let b = FileKey::from_bytes([2u8; 32]);
        let stamp = stamp_digest(&a, b"data");
        assert!(!verify_stamp(&b, b"data", &stamp));
    }
}
