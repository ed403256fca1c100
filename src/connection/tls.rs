//! TLS configuration for https connections.
//!
//! Turns the TLS fields of a [`Connection`](super::Connection) into a rustls
//! `ClientConfig`: trust roots, optional client authentication, and the peer
//! verification mode.

use crate::certificate::{Certificate, PrivateKey};
use crate::{Error, Result};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// Peer certificate verification mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMode {
    /// Server certificate is not verified (development only)
    None,
    /// Server certificate must chain to a trusted root and match the host
    Peer,
}

impl VerifyMode {
    /// Whether the server certificate is checked
    pub fn verifies_peer(&self) -> bool {
        matches!(self, Self::Peer)
    }
}

impl std::fmt::Display for VerifyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "verify-none"),
            Self::Peer => write!(f, "verify-peer"),
        }
    }
}

/// Inputs for building a rustls client configuration
pub(crate) struct TlsSettings<'a> {
    pub ca_file: Option<&'a Path>,
    pub verify_mode: Option<VerifyMode>,
    pub cert: Option<&'a Certificate>,
    pub key: Option<&'a PrivateKey>,
}

impl TlsSettings<'_> {
    /// Build the rustls `ClientConfig`.
    ///
    /// An unset verify mode means the transport default, which verifies the peer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the CA file cannot be read or holds no certificates
    /// - no trust roots could be loaded at all
    /// - rustls rejects the client certificate/key pair
    pub(crate) fn build(&self) -> Result<Arc<ClientConfig>> {
        let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
        let builder = ClientConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()?;

        let builder = match self.verify_mode {
            Some(mode) if !mode.verifies_peer() => {
                tracing::warn!("TLS peer verification disabled");
                builder
                    .dangerous()
                    .with_custom_certificate_verifier(Arc::new(NoVerification { provider }))
            }
            _ => {
                let roots = match self.ca_file {
                    Some(path) => load_custom_ca(path)?,
                    None => load_system_roots()?,
                };
                builder.with_root_certificates(roots)
            }
        };

        let config = match (self.cert, self.key) {
            (Some(cert), Some(key)) => {
                builder.with_client_auth_cert(vec![cert.der().clone()], key.clone_der())?
            }
            _ => builder.with_no_client_auth(),
        };

        Ok(Arc::new(config))
    }
}

/// Native roots, falling back to the bundled Mozilla roots when the platform has none.
fn load_system_roots() -> Result<RootCertStore> {
    let result = rustls_native_certs::load_native_certs();

    let mut store = RootCertStore::empty();
    for cert in result.certs {
        let _ = store.add_parsable_certificates(std::iter::once(cert));
    }

    if store.is_empty() {
        if !result.errors.is_empty() {
            tracing::debug!(
                errors = result.errors.len(),
                "native root certificates unavailable, using bundled roots"
            );
        }
        store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    if store.is_empty() {
        return Err(Error::Config(
            "Failed to load any root certificates".to_string(),
        ));
    }

    Ok(store)
}

/// Trust only the certificates in a PEM bundle
///
/// Blocks other than certificates are skipped. Certificates rustls cannot
/// turn into trust anchors are ignored, but at least one must remain.
fn load_custom_ca(ca_path: &Path) -> Result<RootCertStore> {
    let pem = fs::read(ca_path).map_err(|e| {
        Error::Config(format!("cannot read CA bundle {}: {}", ca_path.display(), e))
    })?;

    let mut reader = Cursor::new(pem.as_slice());
    let parsed: std::result::Result<Vec<_>, _> = rustls_pemfile::certs(&mut reader).collect();
    let certs = parsed.map_err(|e| {
        Error::Config(format!("malformed CA bundle {}: {}", ca_path.display(), e))
    })?;

    let mut store = RootCertStore::empty();
    let (added, ignored) = store.add_parsable_certificates(certs);
    tracing::debug!(
        ca_file = %ca_path.display(),
        added,
        ignored,
        "loaded custom CA bundle"
    );

    if added == 0 {
        return Err(Error::Config(format!(
            "CA bundle {} holds no usable certificates",
            ca_path.display()
        )));
    }

    Ok(store)
}

/// Accepts any server certificate; handshake signatures are still checked.
#[derive(Debug)]
struct NoVerification {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for NoVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
