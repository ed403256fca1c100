//! Connection options
//!
//! Every field is optional; an absent field means "use the transport
//! default". Options can be assembled with [`Options::builder`] or read from
//! a loose JSON mapping with [`Options::from_json`], where unknown keys are
//! ignored.

use crate::connection::{DebugOutput, Proxy};
use crate::{Error, Result};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;

/// Value supplied for the `timeout` option
///
/// Only a number is honored. Any other value is kept as given and skipped
/// when the connection is built, without raising an error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Timeout {
    /// Timeout in seconds
    Seconds(f64),
    /// A non-numeric value
    Unrecognized(serde_json::Value),
}

impl Timeout {
    /// Duration to apply, if the value is a usable number of seconds
    ///
    /// Negative and NaN values yield `None`. Values too large for a
    /// `Duration` saturate to `Duration::MAX`.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Seconds(secs) if secs.is_nan() || *secs < 0.0 => None,
            Self::Seconds(secs) => {
                Some(Duration::try_from_secs_f64(*secs).unwrap_or(Duration::MAX))
            }
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<u64> for Timeout {
    fn from(secs: u64) -> Self {
        Self::Seconds(secs as f64)
    }
}

impl From<i32> for Timeout {
    fn from(secs: i32) -> Self {
        Self::Seconds(f64::from(secs))
    }
}

impl From<f64> for Timeout {
    fn from(secs: f64) -> Self {
        Self::Seconds(secs)
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        Self::Seconds(duration.as_secs_f64())
    }
}

impl From<&str> for Timeout {
    fn from(value: &str) -> Self {
        Self::Unrecognized(serde_json::Value::String(value.to_string()))
    }
}

/// Options controlling timeouts, proxying, tracing and client certificates
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Open and read timeout, in seconds
    pub timeout: Option<Timeout>,
    /// Sink receiving raw wire traffic
    #[serde(skip)]
    pub debug_output: Option<DebugOutput>,
    /// Proxy host
    pub http_proxyaddr: Option<String>,
    /// Proxy port
    pub http_proxyport: Option<u16>,
    /// Proxy user
    pub http_proxyuser: Option<String>,
    /// Proxy password
    pub http_proxypass: Option<String>,
    /// PEM bundle holding the client certificate and key (https only)
    #[serde(deserialize_with = "deserialize_pem")]
    pub pem: Option<Vec<u8>>,
    /// Password for an encrypted key in `pem`
    pub pem_password: Option<String>,
    /// CA bundle used instead of the system roots (https only)
    pub ssl_ca_file: Option<PathBuf>,
    /// Explicit peer verification toggle (https only)
    pub verify: Option<bool>,
}

impl Options {
    /// Create a builder
    ///
    /// # Examples
    ///
    /// ```
    /// use httparty_connect::Options;
    ///
    /// let options = Options::builder()
    ///     .timeout(5)
    ///     .http_proxy("1.2.3.4", 8080)
    ///     .build();
    /// assert!(options.proxy().is_some());
    /// ```
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Read options from a JSON object
    ///
    /// Unknown keys are ignored. A non-numeric `timeout` is accepted and
    /// later skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the text is not JSON or a recognized key
    /// other than `timeout` holds a value of the wrong type.
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::Config(format!("invalid options: {}", e)))
    }

    /// Read options from an already-parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::Config(format!("invalid options: {}", e)))
    }

    /// Timeout to apply, if `timeout` is a usable number
    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.as_ref().and_then(Timeout::as_duration)
    }

    /// Proxy settings, present only when both address and port are given
    pub fn proxy(&self) -> Option<Proxy> {
        match (&self.http_proxyaddr, self.http_proxyport) {
            (Some(addr), Some(port)) => Some(Proxy::new(addr.clone(), port).credentials(
                self.http_proxyuser.clone(),
                self.http_proxypass.clone(),
            )),
            _ => None,
        }
    }

    /// Whether exactly one of proxy address and port was supplied
    pub fn has_partial_proxy(&self) -> bool {
        self.http_proxyaddr.is_some() != self.http_proxyport.is_some()
    }
}

fn deserialize_pem<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PemValue {
        Text(String),
        Bytes(Vec<u8>),
    }

    Ok(Option::<PemValue>::deserialize(deserializer)?.map(|v| match v {
        PemValue::Text(s) => s.into_bytes(),
        PemValue::Bytes(b) => b,
    }))
}

/// Builder for [`Options`]
#[derive(Debug, Clone, Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Set the open and read timeout
    ///
    /// Accepts seconds (`u64`/`f64`), a `Duration`, or text, which is kept
    /// but never applied.
    pub fn timeout(mut self, timeout: impl Into<Timeout>) -> Self {
        self.options.timeout = Some(timeout.into());
        self
    }

    /// Attach a wire trace sink
    pub fn debug_output(mut self, sink: DebugOutput) -> Self {
        self.options.debug_output = Some(sink);
        self
    }

    /// Route through a proxy
    pub fn http_proxy(mut self, address: impl Into<String>, port: u16) -> Self {
        self.options.http_proxyaddr = Some(address.into());
        self.options.http_proxyport = Some(port);
        self
    }

    /// Set the proxy host only
    pub fn http_proxyaddr(mut self, address: impl Into<String>) -> Self {
        self.options.http_proxyaddr = Some(address.into());
        self
    }

    /// Set the proxy port only
    pub fn http_proxyport(mut self, port: u16) -> Self {
        self.options.http_proxyport = Some(port);
        self
    }

    /// Set proxy credentials
    pub fn http_proxy_credentials(
        mut self,
        user: impl Into<String>,
        pass: impl Into<String>,
    ) -> Self {
        self.options.http_proxyuser = Some(user.into());
        self.options.http_proxypass = Some(pass.into());
        self
    }

    /// Set the client certificate PEM bundle
    pub fn pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.options.pem = Some(pem.into());
        self
    }

    /// Set the password for an encrypted key
    pub fn pem_password(mut self, password: impl Into<String>) -> Self {
        self.options.pem_password = Some(password.into());
        self
    }

    /// Trust roots from a CA bundle
    pub fn ssl_ca_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.ssl_ca_file = Some(path.into());
        self
    }

    /// Enable or disable peer verification explicitly
    pub fn verify(mut self, verify: bool) -> Self {
        self.options.verify = Some(verify);
        self
    }

    /// Build the options
    pub fn build(self) -> Options {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_empty() {
        let options = Options::default();
        assert!(options.timeout.is_none());
        assert!(options.debug_output.is_none());
        assert!(options.proxy().is_none());
        assert!(options.pem.is_none());
    }

    #[test]
    fn test_numeric_timeout() {
        let options = Options::builder().timeout(5).build();
        assert_eq!(options.timeout_duration(), Some(Duration::from_secs(5)));

        let options = Options::builder().timeout(0.5).build();
        assert_eq!(options.timeout_duration(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_text_timeout_is_skipped() {
        let options = Options::builder().timeout("five seconds").build();
        assert!(options.timeout.is_some());
        assert!(options.timeout_duration().is_none());
    }

    #[test]
    fn test_unusable_numeric_timeout_is_skipped() {
        assert!(Timeout::Seconds(-1.0).as_duration().is_none());
        assert!(Timeout::Seconds(f64::NAN).as_duration().is_none());
    }

    #[test]
    fn test_huge_timeout_saturates() {
        let options = Options::builder().timeout(u64::MAX).build();
        assert_eq!(options.timeout_duration(), Some(Duration::MAX));
        assert_eq!(
            Timeout::Seconds(f64::INFINITY).as_duration(),
            Some(Duration::MAX)
        );
    }

    #[test]
    fn test_pem_as_byte_array() {
        let options = Options::from_json(r#"{ "pem": [45, 45, 45, 45, 45] }"#).unwrap();
        assert_eq!(options.pem.as_deref(), Some("-----".as_bytes()));
    }

    #[test]
    fn test_proxy_requires_address_and_port() {
        let options = Options::builder().http_proxyaddr("1.2.3.4").build();
        assert!(options.proxy().is_none());
        assert!(options.has_partial_proxy());

        let options = Options::builder().http_proxyport(8080).build();
        assert!(options.proxy().is_none());
        assert!(options.has_partial_proxy());

        let options = Options::builder().http_proxy("1.2.3.4", 8080).build();
        let proxy = options.proxy().unwrap();
        assert_eq!(proxy.address, "1.2.3.4");
        assert_eq!(proxy.port, 8080);
        assert!(proxy.user.is_none());
        assert!(!options.has_partial_proxy());
    }

    #[test]
    fn test_proxy_credentials() {
        let options = Options::builder()
            .http_proxy("1.2.3.4", 8080)
            .http_proxy_credentials("user", "pass")
            .build();
        let proxy = options.proxy().unwrap();
        assert_eq!(proxy.user.as_deref(), Some("user"));
        assert_eq!(proxy.pass.as_deref(), Some("pass"));
    }

    #[test]
    fn test_from_json() {
        let options = Options::from_json(
            r#"{
                "timeout": 5,
                "http_proxyaddr": "1.2.3.4",
                "http_proxyport": 8080,
                "pem": "-----BEGIN CERTIFICATE-----",
                "pem_password": "password",
                "foo": "bar"
            }"#,
        )
        .unwrap();
        assert_eq!(options.timeout_duration(), Some(Duration::from_secs(5)));
        assert!(options.proxy().is_some());
        assert_eq!(
            options.pem.as_deref(),
            Some("-----BEGIN CERTIFICATE-----".as_bytes())
        );
        assert_eq!(options.pem_password.as_deref(), Some("password"));
    }

    #[test]
    fn test_from_value_text_timeout() {
        let options = Options::from_value(json!({ "timeout": "five seconds" })).unwrap();
        assert_eq!(
            options.timeout,
            Some(Timeout::Unrecognized(json!("five seconds")))
        );
        assert!(options.timeout_duration().is_none());
    }

    #[test]
    fn test_from_value_null_timeout_is_absent() {
        let options = Options::from_value(json!({ "timeout": null })).unwrap();
        assert!(options.timeout.is_none());
    }

    #[test]
    fn test_from_json_wrong_type_is_config_error() {
        let err = Options::from_json(r#"{ "http_proxyport": "eighty" }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
