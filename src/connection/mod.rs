//! Connection values and the seams used to build them
//!
//! This module handles:
//! * The configured connection value and its setters
//! * Transport abstraction (how bare connections are created)
//! * Proxy routing and credentials
//! * TLS configuration (verification mode, trust roots, client auth)
//! * Wire trace sinks

mod conn;
mod debug;
mod proxy;
mod tls;
mod transport;

pub use conn::{Connection, HttpConnection};
pub use debug::DebugOutput;
pub use proxy::Proxy;
pub use tls::VerifyMode;
pub use transport::{NetTransport, Transport};
