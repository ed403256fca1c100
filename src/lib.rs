//! Configured HTTP(S) connection construction
//!
//! `httparty-connect` turns a parsed target [`Address`] and an [`Options`] set
//! into a ready-to-use [`Connection`]: TLS enabled for `https`, open/read
//! timeouts, proxy routing, a wire trace sink, and client certificate
//! authentication.
//!
//! Connection assembly is a single synchronous step with no I/O. The
//! resulting value is handed to a transport that performs the actual socket
//! and TLS work.
//!
//! # Example
//!
//! ```
//! use httparty_connect::{Address, ConnectionFactory, DebugOutput, Options};
//!
//! let address = Address::parse("https://api.foo.com")?;
//! let options = Options::builder()
//!     .timeout(5)
//!     .http_proxy("10.0.0.1", 3128)
//!     .debug_output(DebugOutput::stderr())
//!     .build();
//!
//! let conn = ConnectionFactory::new(address, options)?.connection()?;
//! assert!(conn.use_ssl());
//! assert!(conn.is_proxy());
//! # Ok::<(), httparty_connect::Error>(())
//! ```
//!
//! # Leniency
//!
//! Optional values that cannot be used are skipped rather than rejected: a
//! non-numeric `timeout` leaves both timeouts at the transport default, and a
//! proxy address without a port (or the reverse) configures no proxy. The
//! only runtime failure of [`ConnectionFactory::connection`] is a
//! [`CertificateError`] from parsing the `pem` option.

#![warn(missing_docs)]

pub mod address;
pub mod certificate;
pub mod connection;
pub mod error;
pub mod factory;
pub mod metrics;
pub mod options;

pub use address::{Address, Scheme};
pub use certificate::{Certificate, CertificateParser, PemParser, PrivateKey};
pub use connection::{
    Connection, DebugOutput, HttpConnection, NetTransport, Proxy, Transport, VerifyMode,
};
pub use error::{CertificateError, Error, Result};
pub use factory::ConnectionFactory;
pub use options::{Options, OptionsBuilder, Timeout};
