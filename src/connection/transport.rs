//! Transport abstraction (how a bare connection object is created)

use super::conn::{Connection, HttpConnection};
use super::proxy::Proxy;

/// Creates bare connection objects for a host and port.
///
/// Proxy settings are handed over at construction time because some
/// transports cannot switch to a proxy once the connection object exists.
pub trait Transport {
    /// Connection type this transport produces
    type Connection: HttpConnection;

    /// Create an unconfigured connection to `host:port`
    fn new_connection(&self, host: &str, port: u32, proxy: Option<&Proxy>) -> Self::Connection;
}

/// Default transport producing [`Connection`] values
#[derive(Debug, Clone, Copy, Default)]
pub struct NetTransport;

impl Transport for NetTransport {
    type Connection = Connection;

    fn new_connection(&self, host: &str, port: u32, proxy: Option<&Proxy>) -> Connection {
        Connection::new(host, port, proxy.cloned())
    }
}
