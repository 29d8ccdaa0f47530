//! # Certificates
//!
//! X.509 certificates carrying a user's Ed25519 public key.
//!
//! - On the wire a certificate travels as raw DER.
//! - On disk it is PEM armored (`-----BEGIN CERTIFICATE-----`, base64 body
//!   wrapped at 64 columns).
//! - Clients issue their own self-signed certificate on first use.
//!
//! Only the embedded subject public key is consumed by the server; issuer,
//! validity window and extensions are not interpreted.

use crate::signatures::{Ed25519KeyPair, Ed25519PublicKey};
use crate::CryptoError;
use serde::{Deserialize, Serialize};
use x509_parser::prelude::{FromDer, X509Certificate};

/// PEM tag for certificates.
pub const PEM_TAG: &str = "CERTIFICATE";

/// Dotted OID of the Ed25519 key algorithm (RFC 8410).
pub const ED25519_OID: &str = "1.3.101.112";

/// A DER-encoded X.509 certificate that is known to parse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Certificate {
    der: Vec<u8>,
}

impl Certificate {
    /// Wrap DER bytes, rejecting anything that is not a certificate.
    pub fn from_der(der: Vec<u8>) -> Result<Self, CryptoError> {
        X509Certificate::from_der(&der)
            .map_err(|e| CryptoError::InvalidCertificate(e.to_string()))?;
        Ok(Self { der })
    }

    /// Decode a PEM document holding a single certificate.
    pub fn from_pem(text: &str) -> Result<Self, CryptoError> {
        let block = pem::parse(text).map_err(|e| CryptoError::InvalidPem(e.to_string()))?;
        if block.tag() != PEM_TAG {
            return Err(CryptoError::InvalidPem(format!(
                "expected {} block, found {}",
                PEM_TAG,
                block.tag()
            )));
        }
        Self::from_der(block.into_contents())
    }

    /// Issue a self-signed certificate for `subject` over the keypair's
    /// public key.
    pub fn self_signed(keypair: &Ed25519KeyPair, subject: &str) -> Result<Self, CryptoError> {
        let pkcs8 = keypair.to_pkcs8_der()?;
        let key_pair = rcgen::KeyPair::try_from(pkcs8.as_slice())
            .map_err(|e| CryptoError::IssuanceFailed(e.to_string()))?;

        let mut params = rcgen::CertificateParams::new(Vec::<String>::new())
            .map_err(|e| CryptoError::IssuanceFailed(e.to_string()))?;
        params
            .distinguished_name
            .push(rcgen::DnType::CommonName, subject);

        let cert = params
            .self_signed(&key_pair)
            .map_err(|e| CryptoError::IssuanceFailed(e.to_string()))?;
        Ok(Self {
            der: cert.der().to_vec(),
        })
    }

    /// Raw DER bytes.
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    /// PEM armored form, as written to the certificate directory.
    pub fn to_pem(&self) -> String {
        pem::encode(&pem::Pem::new(PEM_TAG, self.der.clone()))
    }

    /// Extract the embedded Ed25519 subject public key.
    ///
    /// # Errors
    ///
    /// `UnsupportedKeyAlgorithm` when the certificate carries another key type.
    pub fn public_key(&self) -> Result<Ed25519PublicKey, CryptoError> {
        let (_, cert) = X509Certificate::from_der(&self.der)
            .map_err(|e| CryptoError::InvalidCertificate(e.to_string()))?;
        let spki = cert.public_key();

        let algorithm = spki.algorithm.algorithm.to_id_string();
        if algorithm != ED25519_OID {
            return Err(CryptoError::UnsupportedKeyAlgorithm(algorithm));
        }
        Ed25519PublicKey::from_slice(spki.subject_public_key.data.as_ref())
    }

    /// Subject common name, if present.
    pub fn subject_common_name(&self) -> Option<String> {
        let (_, cert) = X509Certificate::from_der(&self.der).ok()?;
        let common_name = cert
            .subject()
            .iter_common_name()
            .next()
            .and_then(|cn| cn.as_str().ok())
            .map(str::to_owned);
        common_name
    }
}

impl TryFrom<Vec<u8>> for Certificate {
    type Error = CryptoError;

    fn try_from(der: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_der(der)
    }
}

impl From<Certificate> for Vec<u8> {
    fn from(cert: Certificate) -> Self {
        cert.der
    }
}
