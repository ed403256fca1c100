//! Client certificate and key parsing
//!
//! A [`CertificateParser`] turns raw PEM bytes into the certificate and key a
//! connection presents during the TLS handshake. [`PemParser`] is the default
//! implementation built on `rustls-pemfile`, with `pem` + `pkcs8` handling
//! password-protected PKCS#8 keys.

use crate::CertificateError;
use rustls_pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use std::fmt;
use std::io::Cursor;

/// PEM label of a PKCS#8 encrypted private key block
const ENCRYPTED_PRIVATE_KEY: &str = "ENCRYPTED PRIVATE KEY";

/// DER-encoded X.509 client certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate(CertificateDer<'static>);

impl Certificate {
    /// Wrap DER bytes
    pub fn from_der(der: impl Into<Vec<u8>>) -> Self {
        Self(CertificateDer::from(der.into()))
    }

    /// DER bytes
    pub fn as_der(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Borrow as the rustls certificate type
    pub fn der(&self) -> &CertificateDer<'static> {
        &self.0
    }
}

impl From<CertificateDer<'static>> for Certificate {
    fn from(der: CertificateDer<'static>) -> Self {
        Self(der)
    }
}

/// Client private key
pub struct PrivateKey(PrivateKeyDer<'static>);

impl PrivateKey {
    /// Wrap PKCS#8 DER bytes
    pub fn from_pkcs8_der(der: impl Into<Vec<u8>>) -> Self {
        Self(PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(der.into())))
    }

    /// Borrow as the rustls key type
    pub fn der(&self) -> &PrivateKeyDer<'static> {
        &self.0
    }

    /// Owned copy of the rustls key type
    pub fn clone_der(&self) -> PrivateKeyDer<'static> {
        self.0.clone_key()
    }
}

impl From<PrivateKeyDer<'static>> for PrivateKey {
    fn from(der: PrivateKeyDer<'static>) -> Self {
        Self(der)
    }
}

impl Clone for PrivateKey {
    fn clone(&self) -> Self {
        Self(self.0.clone_key())
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.secret_der() == other.0.secret_der()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.0 {
            PrivateKeyDer::Pkcs1(_) => "pkcs1",
            PrivateKeyDer::Sec1(_) => "sec1",
            PrivateKeyDer::Pkcs8(_) => "pkcs8",
            _ => "unknown",
        };
        f.debug_tuple("PrivateKey").field(&kind).finish()
    }
}

/// Parses client certificates and keys from PEM bytes.
pub trait CertificateParser {
    /// Parse the first certificate in `pem`.
    fn parse_certificate(&self, pem: &[u8]) -> Result<Certificate, CertificateError>;

    /// Parse the private key in `pem`, decrypting it with `password` if given.
    fn parse_key(&self, pem: &[u8], password: Option<&str>)
        -> Result<PrivateKey, CertificateError>;
}

/// Default [`CertificateParser`] for PEM bundles.
///
/// Accepts a single buffer holding both the certificate and the key, in any
/// order. Unencrypted keys may be PKCS#1, SEC1 or PKCS#8. Encrypted keys
/// must be PKCS#8 (`ENCRYPTED PRIVATE KEY`); legacy OpenSSL-encrypted
/// PKCS#1 blocks are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct PemParser;

impl PemParser {
    fn decrypt_key(pem: &[u8], password: &str) -> Result<Option<PrivateKey>, CertificateError> {
        let blocks =
            pem::parse_many(pem).map_err(|e| CertificateError::MalformedKey(e.to_string()))?;

        let encrypted = match blocks.iter().find(|b| b.tag() == ENCRYPTED_PRIVATE_KEY) {
            Some(block) => block,
            None => return Ok(None),
        };

        let info = pkcs8::EncryptedPrivateKeyInfo::try_from(encrypted.contents())
            .map_err(|e| CertificateError::MalformedKey(e.to_string()))?;
        let document = info
            .decrypt(password)
            .map_err(|e| CertificateError::Decryption(e.to_string()))?;

        Ok(Some(PrivateKey::from_pkcs8_der(document.as_bytes())))
    }

    fn has_legacy_encryption(pem: &[u8]) -> bool {
        String::from_utf8_lossy(pem).contains("Proc-Type: 4,ENCRYPTED")
    }
}

impl CertificateParser for PemParser {
    fn parse_certificate(&self, pem: &[u8]) -> Result<Certificate, CertificateError> {
        let mut reader = Cursor::new(pem);
        let first = rustls_pemfile::certs(&mut reader).next();
        match first {
            Some(Ok(cert)) => Ok(Certificate(cert)),
            Some(Err(e)) => Err(CertificateError::MalformedCertificate(e.to_string())),
            None => Err(CertificateError::NoCertificate),
        }
    }

    fn parse_key(
        &self,
        pem: &[u8],
        password: Option<&str>,
    ) -> Result<PrivateKey, CertificateError> {
        if Self::has_legacy_encryption(pem) {
            return Err(CertificateError::UnsupportedKeyEncryption(
                "legacy PEM encryption (Proc-Type: 4,ENCRYPTED); convert the key to PKCS#8"
                    .into(),
            ));
        }

        if let Some(password) = password {
            if let Some(key) = Self::decrypt_key(pem, password)? {
                return Ok(key);
            }
            // An unencrypted key is loaded as-is; the password goes unused
        }

        let mut reader = Cursor::new(pem);
        match rustls_pemfile::private_key(&mut reader) {
            Ok(Some(key)) => Ok(PrivateKey(key)),
            Ok(None) => {
                let has_encrypted = pem::parse_many(pem)
                    .map(|blocks| blocks.iter().any(|b| b.tag() == ENCRYPTED_PRIVATE_KEY))
                    .unwrap_or(false);
                if has_encrypted {
                    Err(CertificateError::Decryption(
                        "private key is encrypted and no password was supplied".into(),
                    ))
                } else {
                    Err(CertificateError::NoPrivateKey)
                }
            }
            Err(e) => Err(CertificateError::MalformedKey(e.to_string())),
        }
    }
}
