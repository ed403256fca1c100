//! Counter helpers

use super::labels;
use crate::Scheme;

/// Record a connection built for `scheme`
pub fn connection_built(scheme: Scheme) {
    ::metrics::counter!(labels::CONNECTIONS_BUILT, labels::SCHEME => scheme.as_str()).increment(1);
}

/// Record a client certificate attached to a connection
pub fn client_cert_loaded() {
    ::metrics::counter!(labels::CLIENT_CERTS_LOADED).increment(1);
}

/// Record a certificate or key parsing failure
pub fn certificate_error() {
    ::metrics::counter!(labels::CERTIFICATE_ERRORS).increment(1);
}

/// Record an option skipped because its value could not be used
pub fn option_skipped(option: &'static str) {
    ::metrics::counter!(labels::OPTIONS_SKIPPED, labels::OPTION => option).increment(1);
}
