//! Metric names and label values

/// Connections built, labelled by scheme
pub const CONNECTIONS_BUILT: &str = "httparty_connect_connections_built_total";
/// Client certificates attached to connections
pub const CLIENT_CERTS_LOADED: &str = "httparty_connect_client_certs_loaded_total";
/// Certificate or key parsing failures
pub const CERTIFICATE_ERRORS: &str = "httparty_connect_certificate_errors_total";
/// Options skipped because their value was unusable, labelled by option
pub const OPTIONS_SKIPPED: &str = "httparty_connect_options_skipped_total";

/// Label key for the address scheme
pub const SCHEME: &str = "scheme";
/// Label key for the option name
pub const OPTION: &str = "option";

/// Option label value for `timeout`
pub const OPTION_TIMEOUT: &str = "timeout";
/// Option label value for partial proxy settings
pub const OPTION_PROXY: &str = "http_proxy";
