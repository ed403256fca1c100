//! Target address parsing
//!
//! Supports formats:
//! * http://host[:port][/path]
//! * https://host[:port][/path]
//!
//! The default port is 80 for `http` and 443 for `https`. Paths, queries and
//! userinfo are accepted by the parser but play no part in the connection.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// URL scheme of a target address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Plain HTTP
    Http,
    /// HTTP over TLS
    Https,
}

impl Scheme {
    /// Port used when the address does not name one
    pub fn default_port(&self) -> u32 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }

    /// Lowercase scheme name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(Error::InvalidArgument(format!(
                "unsupported scheme '{}': expected http or https",
                other
            ))),
        }
    }
}

/// A parsed network endpoint
///
/// Construction always goes through [`Address::new`] or one of the parsing
/// entry points, so a value of this type is already structured. Raw strings
/// are never accepted where an `Address` is expected.
///
/// The port is kept as a `u32` and is not range-checked: any port the caller
/// names is carried through to the transport, which rejects unusable values
/// when it performs I/O.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    scheme: Scheme,
    host: String,
    port: u32,
}

impl Address {
    /// Build an address from its parts
    pub fn new(scheme: Scheme, host: impl Into<String>, port: u32) -> Self {
        Self {
            scheme,
            host: host.into(),
            port,
        }
    }

    /// Parse a URL into an address
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the URL does not parse, uses a
    /// scheme other than http/https, or has no host. Ports above 65535 are
    /// accepted as long as they fit in a `u32`.
    ///
    /// # Examples
    ///
    /// ```
    /// use httparty_connect::{Address, Scheme};
    ///
    /// let addr = Address::parse("https://api.foo.com/v1").unwrap();
    /// assert_eq!(addr.scheme(), Scheme::Https);
    /// assert_eq!(addr.port(), 443);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        match Url::parse(s) {
            Ok(url) => Self::try_from(&url),
            Err(url::ParseError::InvalidPort) => Self::parse_wide_port(s),
            Err(e) => Err(Error::InvalidArgument(format!(
                "invalid address '{}': {}",
                s, e
            ))),
        }
    }

    /// Parse an address whose port does not fit in 16 bits
    ///
    /// The port is split off the authority and the rest is validated by the
    /// URL parser as usual.
    fn parse_wide_port(s: &str) -> Result<Self> {
        let invalid =
            || Error::InvalidArgument(format!("invalid address '{}': invalid port number", s));

        let (scheme, rest) = s.split_once("://").ok_or_else(invalid)?;
        let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let (authority, tail) = rest.split_at(authority_end);
        let (host, port) = authority.rsplit_once(':').ok_or_else(invalid)?;
        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let port: u32 = port.parse().map_err(|_| invalid())?;

        let url = Url::parse(&format!("{}://{}{}", scheme, host, tail))
            .map_err(|e| Error::InvalidArgument(format!("invalid address '{}': {}", s, e)))?;
        let base = Self::try_from(&url)?;

        Ok(Self::new(base.scheme, base.host, port))
    }

    /// URL scheme
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Host name or IP literal
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port (explicit or scheme default)
    pub fn port(&self) -> u32 {
        self.port
    }

    /// Whether the scheme is `https`
    pub fn is_https(&self) -> bool {
        self.scheme == Scheme::Https
    }
}

impl TryFrom<&Url> for Address {
    type Error = Error;

    fn try_from(url: &Url) -> Result<Self> {
        let scheme: Scheme = url.scheme().parse()?;
        let host = match url.host_str() {
            Some(h) if !h.is_empty() => h,
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "address '{}' has no host",
                    url
                )))
            }
        };
        // IPv6 literals come back bracketed; the transport wants the bare address
        let host = host.trim_start_matches('[').trim_end_matches(']');
        let port = url
            .port()
            .map(u32::from)
            .unwrap_or_else(|| scheme.default_port());

        Ok(Self::new(scheme, host, port))
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "{}://[{}]:{}", self.scheme, self.host, self.port)
        } else {
            write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_default_port() {
        let addr = Address::parse("http://www.google.com").unwrap();
        assert_eq!(addr.scheme(), Scheme::Http);
        assert_eq!(addr.host(), "www.google.com");
        assert_eq!(addr.port(), 80);
        assert!(!addr.is_https());
    }

    #[test]
    fn test_parse_https_with_path() {
        // The trailing ":443" belongs to the path, not the authority
        let addr = Address::parse("https://api.foo.com/v1:443").unwrap();
        assert_eq!(addr.scheme(), Scheme::Https);
        assert_eq!(addr.host(), "api.foo.com");
        assert_eq!(addr.port(), 443);
    }

    #[test]
    fn test_parse_explicit_port() {
        let addr = Address::parse("https://foobar.com:8443").unwrap();
        assert_eq!(addr.port(), 8443);
        assert!(addr.is_https());
    }

    #[test]
    fn test_parse_uppercase_scheme_is_normalized() {
        let addr = Address::parse("HTTPS://Example.COM").unwrap();
        assert_eq!(addr.scheme(), Scheme::Https);
        assert_eq!(addr.host(), "example.com");
    }

    #[test]
    fn test_parse_ipv6_host() {
        let addr = Address::parse("http://[::1]:8080").unwrap();
        assert_eq!(addr.host(), "::1");
        assert_eq!(addr.to_string(), "http://[::1]:8080");
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        let err = Address::parse("ftp://example.com").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Address::parse("www.google.com"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(Address::parse(""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_parse_port_beyond_u16() {
        let addr = Address::parse("https://foobar.com:123456").unwrap();
        assert_eq!(addr.scheme(), Scheme::Https);
        assert_eq!(addr.host(), "foobar.com");
        assert_eq!(addr.port(), 123456);

        let addr = Address::parse("http://user:pw@foobar.com:70000/path?q=1").unwrap();
        assert_eq!(addr.host(), "foobar.com");
        assert_eq!(addr.port(), 70000);
    }

    #[test]
    fn test_parse_port_not_numeric() {
        assert!(matches!(
            Address::parse("https://foobar.com:12ab"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Address::parse("https://foobar.com:99999999999"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_new_accepts_out_of_range_port() {
        let addr = Address::new(Scheme::Https, "foobar.com", 123456);
        assert_eq!(addr.port(), 123456);
        assert!(addr.is_https());
    }

    #[test]
    fn test_scheme_from_str() {
        assert_eq!("http".parse::<Scheme>().unwrap(), Scheme::Http);
        assert_eq!("HTTPS".parse::<Scheme>().unwrap(), Scheme::Https);
        assert!("ws".parse::<Scheme>().is_err());
    }

    #[test]
    fn test_display() {
        let addr = Address::parse("https://google.com").unwrap();
        assert_eq!(addr.to_string(), "https://google.com:443");
    }
}
