//! HTTP proxy settings

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;

/// Proxy a connection is routed through
#[derive(Clone, PartialEq, Eq)]
pub struct Proxy {
    /// Proxy host
    pub address: String,
    /// Proxy port
    pub port: u16,
    /// Proxy user (optional)
    pub user: Option<String>,
    /// Proxy password (optional)
    pub pass: Option<String>,
}

impl Proxy {
    /// Proxy without credentials
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            user: None,
            pass: None,
        }
    }

    /// Attach credentials
    pub fn credentials(mut self, user: Option<String>, pass: Option<String>) -> Self {
        self.user = user;
        self.pass = pass;
        self
    }

    /// Value for a `Proxy-Authorization` header, if a user is set
    ///
    /// A missing password is sent as empty.
    pub fn authorization(&self) -> Option<String> {
        let user = self.user.as_deref()?;
        let pass = self.pass.as_deref().unwrap_or("");
        Some(format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", user, pass))
        ))
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
