//! # Ed25519 Signatures
//!
//! Identity keys for marketplace users. Clients hold an [`Ed25519KeyPair`];
//! the server only ever sees the [`Ed25519PublicKey`] embedded in a
//! certificate.
//!
//! ## Security Properties
//!
//! - Deterministic signatures (no RNG at signing time)
//! - Strict verification: rejects small-order keys and non-canonical `S`

use crate::CryptoError;
use ed25519_dalek::pkcs8::EncodePrivateKey;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use zeroize::Zeroizing;

/// Ed25519 public key length.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Ed25519 signature length.
pub const SIGNATURE_LEN: usize = 64;

/// Ed25519 public key (32 bytes, validated as a curve point).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; PUBLIC_KEY_LEN]);

impl Ed25519PublicKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Result<Self, CryptoError> {
        VerifyingKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Create from a slice of exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; PUBLIC_KEY_LEN] =
            bytes.try_into().map_err(|_| CryptoError::InvalidPublicKey)?;
        Self::from_bytes(array)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Verify a signature over `message`.
    ///
    /// # Errors
    ///
    /// `InvalidSignatureFormat` for a signature that is not 64 bytes,
    /// `SignatureVerificationFailed` when the check itself fails.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;

        let sig = ed25519_dalek::Signature::from_slice(signature)
            .map_err(|_| CryptoError::InvalidSignatureFormat)?;

        verifying_key
            .verify_strict(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// Ed25519 keypair.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        Self { signing_key }
    }

    /// Create from secret seed (32 bytes).
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        Self { signing_key }
    }

    /// Get public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message, returning the 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_bytes().to_vec()
    }

    /// PKCS#8 DER encoding of the private key, for certificate issuance.
    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let document = self
            .signing_key
            .to_pkcs8_der()
            .map_err(|e| CryptoError::IssuanceFailed(e.to_string()))?;
        Ok(Zeroizing::new(document.as_bytes().to_vec()))
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &hex::encode(self.public_key().as_bytes()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let keypair = Ed25519KeyPair::generate();
        let message = b"nonce-bytes";

        let signature = keypair.sign(message);
        assert_eq!(signature.len(), SIGNATURE_LEN);
        assert!(keypair.public_key().verify(message, &signature).is_ok());
    }

    #[test]
    fn test_wrong_message_fails() {
        let keypair = Ed25519KeyPair::generate();

        let signature = keypair.sign(b"message1");
        let result = keypair.public_key().verify(b"message2", &signature);

        assert!(matches!(result, Err(CryptoError::SignatureVerificationFailed)));
    }

    #[test]
    fn test_wrong_key_fails() {
        let keypair1 = Ed25519KeyPair::generate();
        let keypair2 = Ed25519KeyPair::generate();

        let signature = keypair1.sign(b"test");
        assert!(keypair2.public_key().verify(b"test", &signature).is_err());
    }

    #[test]
    fn test_truncated_signature_is_format_error() {
        let keypair = Ed25519KeyPair::generate();
        let signature = keypair.sign(b"test");

        let result = keypair.public_key().verify(b"test", &signature[..10]);
        assert!(matches!(result, Err(CryptoError::InvalidSignatureFormat)));
    }

    #[test]
    fn test_deterministic_signatures() {
        let keypair = Ed25519KeyPair::from_seed([0xABu8; 32]);
        assert_eq!(keypair.sign(b"same"), keypair.sign(b"same"));
    }

    #[test]
    fn test_public_key_from_slice_length() {
        let keypair = Ed25519KeyPair::generate();
        let bytes = keypair.public_key().as_bytes().to_vec();

        assert_eq!(
            Ed25519PublicKey::from_slice(&bytes).unwrap(),
            keypair.public_key()
        );
        assert!(Ed25519PublicKey::from_slice(&bytes[..31]).is_err());
    }

    #[test]
    fn test_pkcs8_export() {
        let keypair = Ed25519KeyPair::from_seed([7u8; 32]);
        let der = keypair.to_pkcs8_der().unwrap();
        // 16-byte PKCS#8 header, then the seed.
        assert!(der.len() >= 48);
        assert_eq!(&der[16..48], &[7u8; 32]);
    }
}
