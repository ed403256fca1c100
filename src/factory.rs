//! Connection factory
//!
//! Assembles a configured connection from an [`Address`] and [`Options`] by
//! applying independent steps to a freshly created connection:
//!
//! 1. base construction (host, port, proxy)
//! 2. TLS activation (scheme `https` only)
//! 3. open/read timeouts (numeric `timeout` only)
//! 4. debug tracing (`debug_output` only)
//! 5. trust roots and verification toggle (https only)
//! 6. client certificate and key (https with `pem` only)
//!
//! Each step touches its own fields, so the order only matters for
//! determinism.

use crate::certificate::{CertificateParser, PemParser};
use crate::connection::{Connection, HttpConnection, NetTransport, Transport, VerifyMode};
use crate::metrics::{counters, labels};
use crate::{Address, Error, Options, Result};

/// Builds configured connections for one address and one set of options.
///
/// Inputs are fixed for the lifetime of the factory; every call to
/// [`connection`](Self::connection) produces a new, independent connection.
///
/// An address must be a parsed [`Address`]; raw strings do not type-check:
///
/// ```compile_fail
/// use httparty_connect::{ConnectionFactory, Options};
///
/// let factory = ConnectionFactory::new("http://www.google.com", Options::default());
/// ```
///
/// # Examples
///
/// ```
/// use httparty_connect::{Address, ConnectionFactory, Options};
///
/// let address = Address::parse("https://api.foo.com").unwrap();
/// let factory = ConnectionFactory::new(address, Options::builder().timeout(5).build()).unwrap();
///
/// let conn = factory.connection().unwrap();
/// assert!(conn.use_ssl());
/// assert_eq!(conn.read_timeout(), Some(std::time::Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionFactory<T = NetTransport, P = PemParser> {
    address: Address,
    options: Options,
    transport: T,
    parser: P,
}

impl ConnectionFactory {
    /// Create a factory with the default transport and PEM parser
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `address` is `None`.
    pub fn new(address: impl Into<Option<Address>>, options: Options) -> Result<Self> {
        Self::with_parts(address, options, NetTransport, PemParser)
    }

    /// Create a factory with empty options
    pub fn for_address(address: impl Into<Option<Address>>) -> Result<Self> {
        Self::new(address, Options::default())
    }

    /// Build a single connection in one step
    pub fn call(address: impl Into<Option<Address>>, options: Options) -> Result<Connection> {
        Self::new(address, options)?.connection()
    }
}

impl<T, P> ConnectionFactory<T, P>
where
    T: Transport,
    P: CertificateParser,
{
    /// Create a factory with a custom transport and certificate parser
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `address` is `None`.
    pub fn with_parts(
        address: impl Into<Option<Address>>,
        options: Options,
        transport: T,
        parser: P,
    ) -> Result<Self> {
        let address = address
            .into()
            .ok_or_else(|| Error::InvalidArgument("an address is required".into()))?;

        Ok(Self {
            address,
            options,
            transport,
            parser,
        })
    }

    /// Target address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Options applied to every connection
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Transport creating bare connections
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Parser for the `pem` option
    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Build a new configured connection
    ///
    /// # Errors
    ///
    /// Returns [`Error::Certificate`] if the scheme is https and the `pem`
    /// option cannot be parsed into a certificate and key. No other input
    /// makes this fail; unusable optional values are skipped.
    pub fn connection(&self) -> Result<T::Connection> {
        tracing::trace!(address = %self.address, "building connection");

        let mut conn = self.base_connection();
        self.attach_tls(&mut conn);
        self.attach_timeouts(&mut conn);
        self.attach_debug_output(&mut conn);
        self.attach_trust_settings(&mut conn);
        self.attach_client_certificate(&mut conn)?;

        counters::connection_built(self.address.scheme());
        Ok(conn)
    }

    fn base_connection(&self) -> T::Connection {
        let proxy = self.options.proxy();
        match &proxy {
            Some(p) => {
                tracing::debug!(proxy_address = %p.address, proxy_port = p.port, "routing through proxy")
            }
            None if self.options.has_partial_proxy() => {
                tracing::debug!("proxy address and port must both be set, ignoring proxy");
                counters::option_skipped(labels::OPTION_PROXY);
            }
            None => {}
        }

        self.transport
            .new_connection(self.address.host(), self.address.port(), proxy.as_ref())
    }

    fn attach_tls(&self, conn: &mut T::Connection) {
        if self.address.is_https() {
            tracing::debug!("enabling TLS");
            conn.set_use_ssl(true);
        }
    }

    fn attach_timeouts(&self, conn: &mut T::Connection) {
        let Some(timeout) = &self.options.timeout else {
            return;
        };

        match timeout.as_duration() {
            Some(duration) => {
                tracing::debug!(timeout = ?duration, "setting open and read timeout");
                conn.set_open_timeout(duration);
                conn.set_read_timeout(duration);
            }
            None => {
                tracing::debug!(timeout = ?timeout, "timeout is not a usable number, skipping");
                counters::option_skipped(labels::OPTION_TIMEOUT);
            }
        }
    }

    fn attach_debug_output(&self, conn: &mut T::Connection) {
        if let Some(sink) = &self.options.debug_output {
            tracing::debug!("attaching debug output");
            conn.set_debug_output(sink.clone());
        }
    }

    fn attach_trust_settings(&self, conn: &mut T::Connection) {
        if !self.address.is_https() {
            return;
        }

        if let Some(ca_file) = &self.options.ssl_ca_file {
            tracing::debug!(ca_file = %ca_file.display(), "using custom CA bundle");
            conn.set_ca_file(ca_file.clone());
        }

        match self.options.verify {
            Some(false) => conn.set_verify_mode(VerifyMode::None),
            Some(true) => conn.set_verify_mode(VerifyMode::Peer),
            None => {}
        }
    }

    fn attach_client_certificate(&self, conn: &mut T::Connection) -> Result<()> {
        if !self.address.is_https() {
            return Ok(());
        }
        let Some(pem) = &self.options.pem else {
            return Ok(());
        };

        let password = self.options.pem_password.as_deref();
        let parsed = self
            .parser
            .parse_certificate(pem)
            .and_then(|cert| Ok((cert, self.parser.parse_key(pem, password)?)));
        let (cert, key) = parsed.map_err(|e| {
            counters::certificate_error();
            Error::Certificate(e)
        })?;

        tracing::debug!(encrypted = password.is_some(), "attaching client certificate");
        conn.set_cert(cert);
        conn.set_key(key);
        // An explicit `verify` was already applied by the trust step
        if self.options.verify.is_none() {
            conn.set_verify_mode(VerifyMode::Peer);
        }
        counters::client_cert_loaded();

        Ok(())
    }
}
