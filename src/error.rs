//! Error types

use thiserror::Error;

/// Main error type for connection construction
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied an unusable argument (e.g. a missing or unparsable address)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Certificate or key parsing failed
    #[error(transparent)]
    Certificate(#[from] CertificateError),

    /// Options mapping could not be interpreted
    #[error("invalid configuration: {0}")]
    Config(String),

    /// rustls rejected the TLS client configuration
    #[error("tls error: {0}")]
    Tls(#[from] rustls::Error),

    /// I/O error (reading a CA bundle, writing to a debug sink)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a [`CertificateParser`](crate::CertificateParser).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CertificateError {
    /// The PEM input contained no certificate block
    #[error("no certificate found in PEM data")]
    NoCertificate,

    /// The PEM input contained no private key block
    #[error("no private key found in PEM data")]
    NoPrivateKey,

    /// A certificate block was present but could not be decoded
    #[error("malformed certificate: {0}")]
    MalformedCertificate(String),

    /// A key block was present but could not be decoded
    #[error("malformed private key: {0}")]
    MalformedKey(String),

    /// The encrypted key could not be decrypted (usually a wrong password)
    #[error("failed to decrypt private key: {0}")]
    Decryption(String),

    /// The key uses an encryption scheme this parser does not handle
    #[error("unsupported private key encryption: {0}")]
    UnsupportedKeyEncryption(String),
}

impl Error {
    /// Whether this error came from certificate or key parsing
    pub fn is_certificate_error(&self) -> bool {
        matches!(self, Error::Certificate(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
