//! Core connection type

use super::debug::DebugOutput;
use super::proxy::Proxy;
use super::tls::{TlsSettings, VerifyMode};
use crate::certificate::{Certificate, PrivateKey};
use crate::Result;
use rustls::ClientConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Mutable connection fields a factory configures after construction.
///
/// Each setter corresponds to one configuration step; the factory calls a
/// setter only when the matching option applies.
pub trait HttpConnection {
    /// Enable or disable TLS
    fn set_use_ssl(&mut self, enabled: bool);

    /// Set the timeout for opening the connection
    fn set_open_timeout(&mut self, timeout: Duration);

    /// Set the timeout for each read
    fn set_read_timeout(&mut self, timeout: Duration);

    /// Attach a sink for raw wire traffic
    fn set_debug_output(&mut self, sink: DebugOutput);

    /// Attach a client certificate
    fn set_cert(&mut self, cert: Certificate);

    /// Attach the private key for the client certificate
    fn set_key(&mut self, key: PrivateKey);

    /// Set the peer verification mode
    fn set_verify_mode(&mut self, mode: VerifyMode);

    /// Trust roots from a PEM bundle instead of the system store
    fn set_ca_file(&mut self, path: PathBuf);
}

/// Configured HTTP(S) connection
///
/// A plain value: it performs no I/O itself and carries everything a
/// transport needs to open the socket, negotiate TLS and trace traffic.
/// Unset fields mean "use the transport default".
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    host: String,
    port: u32,
    proxy: Option<Proxy>,
    use_ssl: bool,
    open_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    debug_output: Option<DebugOutput>,
    cert: Option<Certificate>,
    key: Option<PrivateKey>,
    verify_mode: Option<VerifyMode>,
    ca_file: Option<PathBuf>,
}

impl Connection {
    /// Create a connection bound to `host:port`, optionally through a proxy
    pub fn new(host: impl Into<String>, port: u32, proxy: Option<Proxy>) -> Self {
        Self {
            host: host.into(),
            port,
            proxy,
            use_ssl: false,
            open_timeout: None,
            read_timeout: None,
            debug_output: None,
            cert: None,
            key: None,
            verify_mode: None,
            ca_file: None,
        }
    }

    /// Target host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Target port
    pub fn port(&self) -> u32 {
        self.port
    }

    /// Whether TLS is enabled
    pub fn use_ssl(&self) -> bool {
        self.use_ssl
    }

    /// Timeout for opening the connection, if configured
    pub fn open_timeout(&self) -> Option<Duration> {
        self.open_timeout
    }

    /// Timeout for each read, if configured
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    /// Attached trace sink
    pub fn debug_output(&self) -> Option<&DebugOutput> {
        self.debug_output.as_ref()
    }

    /// Whether the connection is routed through a proxy
    pub fn is_proxy(&self) -> bool {
        self.proxy.is_some()
    }

    /// Proxy settings
    pub fn proxy(&self) -> Option<&Proxy> {
        self.proxy.as_ref()
    }

    /// Proxy host
    pub fn proxy_address(&self) -> Option<&str> {
        self.proxy.as_ref().map(|p| p.address.as_str())
    }

    /// Proxy port
    pub fn proxy_port(&self) -> Option<u16> {
        self.proxy.as_ref().map(|p| p.port)
    }

    /// Proxy user
    pub fn proxy_user(&self) -> Option<&str> {
        self.proxy.as_ref().and_then(|p| p.user.as_deref())
    }

    /// Proxy password
    pub fn proxy_pass(&self) -> Option<&str> {
        self.proxy.as_ref().and_then(|p| p.pass.as_deref())
    }

    /// `Proxy-Authorization` header value for the configured proxy credentials
    pub fn proxy_authorization(&self) -> Option<String> {
        self.proxy.as_ref().and_then(Proxy::authorization)
    }

    /// Client certificate
    pub fn cert(&self) -> Option<&Certificate> {
        self.cert.as_ref()
    }

    /// Client private key
    pub fn key(&self) -> Option<&PrivateKey> {
        self.key.as_ref()
    }

    /// Peer verification mode (`None` = transport default)
    pub fn verify_mode(&self) -> Option<VerifyMode> {
        self.verify_mode
    }

    /// Custom CA bundle
    pub fn ca_file(&self) -> Option<&Path> {
        self.ca_file.as_deref()
    }

    /// Write raw traffic to the debug sink, if one is attached
    pub fn trace(&self, data: &[u8]) -> Result<()> {
        if let Some(sink) = &self.debug_output {
            sink.write_all(data)?;
        }
        Ok(())
    }

    /// rustls client configuration for this connection
    ///
    /// Returns `None` when TLS is disabled.
    ///
    /// # Errors
    ///
    /// Fails if trust roots cannot be loaded or rustls rejects the client
    /// certificate/key pair.
    pub fn client_config(&self) -> Result<Option<Arc<ClientConfig>>> {
        if !self.use_ssl {
            return Ok(None);
        }

        let settings = TlsSettings {
            ca_file: self.ca_file.as_deref(),
            verify_mode: self.verify_mode,
            cert: self.cert.as_ref(),
            key: self.key.as_ref(),
        };
        settings.build().map(Some)
    }

    /// Connector a tokio transport can use for the TLS handshake
    ///
    /// Returns `None` when TLS is disabled.
    pub fn tls_connector(&self) -> Result<Option<tokio_rustls::TlsConnector>> {
        Ok(self.client_config()?.map(tokio_rustls::TlsConnector::from))
    }
}

impl HttpConnection for Connection {
    fn set_use_ssl(&mut self, enabled: bool) {
        self.use_ssl = enabled;
    }

    fn set_open_timeout(&mut self, timeout: Duration) {
        self.open_timeout = Some(timeout);
    }

    fn set_read_timeout(&mut self, timeout: Duration) {
        self.read_timeout = Some(timeout);
    }

    fn set_debug_output(&mut self, sink: DebugOutput) {
        self.debug_output = Some(sink);
    }

    fn set_cert(&mut self, cert: Certificate) {
        self.cert = Some(cert);
    }

    fn set_key(&mut self, key: PrivateKey) {
        self.key = Some(key);
    }

    fn set_verify_mode(&mut self, mode: VerifyMode) {
        self.verify_mode = Some(mode);
    }

    fn set_ca_file(&mut self, path: PathBuf) {
        self.ca_file = Some(path);
    }
}
