//! Integration tests for client certificate handling
//!
//! These tests run the default `PemParser` against real PEM fixtures and
//! check that the resulting connection produces a usable rustls client
//! configuration.
//!
//! The fixtures were generated with:
//! ```bash
//! openssl req -x509 -newkey ec -pkeyopt ec_paramgen_curve:prime256v1 \
//!   -keyout key.pem -out cert.pem -days 36500 -nodes -subj "/CN=client.test"
//! openssl pkcs8 -topk8 -in key.pem -out key.enc.pem \
//!   -v2 aes-256-cbc -v2prf hmacWithSHA256 -passout pass:password
//! cat cert.pem key.pem > client.pem
//! cat cert.pem key.enc.pem > client_encrypted.pem
//! ```

#[cfg(test)]
mod tls_integration {
    use httparty_connect::{
        Address, CertificateError, CertificateParser, ConnectionFactory, Error, Options,
        PemParser, VerifyMode,
    };
    use std::path::PathBuf;

    const CLIENT_PEM: &[u8] = include_bytes!("fixtures/client.pem");
    const CLIENT_ENCRYPTED_PEM: &[u8] = include_bytes!("fixtures/client_encrypted.pem");

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    fn https() -> Address {
        Address::parse("https://google.com").expect("valid address")
    }

    #[test]
    fn test_pem_bundle_attaches_certificate_and_key() {
        let options = Options::builder().pem(CLIENT_PEM).build();
        let conn = ConnectionFactory::call(https(), options).expect("connection");

        assert_eq!(
            conn.cert(),
            Some(&PemParser.parse_certificate(CLIENT_PEM).unwrap())
        );
        assert_eq!(
            conn.key(),
            Some(&PemParser.parse_key(CLIENT_PEM, None).unwrap())
        );
        assert_eq!(conn.verify_mode(), Some(VerifyMode::Peer));
    }

    #[test]
    fn test_encrypted_pem_with_password() {
        let options = Options::builder()
            .pem(CLIENT_ENCRYPTED_PEM)
            .pem_password("password")
            .build();
        let conn = ConnectionFactory::call(https(), options).expect("connection");

        // Decrypting yields the same key as the unencrypted bundle
        assert_eq!(
            conn.key(),
            Some(&PemParser.parse_key(CLIENT_PEM, None).unwrap())
        );
    }

    #[test]
    fn test_encrypted_pem_with_wrong_password() {
        let options = Options::builder()
            .pem(CLIENT_ENCRYPTED_PEM)
            .pem_password("not the password")
            .build();
        match ConnectionFactory::call(https(), options) {
            Err(Error::Certificate(CertificateError::Decryption(_))) => {}
            other => panic!("expected decryption error, got {:?}", other),
        }
    }

    #[test]
    fn test_client_config_presents_client_certificate() {
        let options = Options::builder().pem(CLIENT_PEM).build();
        let conn = ConnectionFactory::call(https(), options).expect("connection");

        let config = conn
            .client_config()
            .expect("client config")
            .expect("https connection has a client config");
        assert!(config.client_auth_cert_resolver.has_certs());
        assert!(conn.tls_connector().expect("connector").is_some());
    }

    #[test]
    fn test_client_config_with_custom_ca() {
        let options = Options::builder()
            .ssl_ca_file(fixture("client.pem"))
            .build();
        let conn = ConnectionFactory::call(https(), options).expect("connection");
        assert!(conn.client_config().expect("client config").is_some());
    }

    #[test]
    fn test_client_config_without_verification() {
        let options = Options::builder().verify(false).build();
        let conn = ConnectionFactory::call(https(), options).expect("connection");
        assert_eq!(conn.verify_mode(), Some(VerifyMode::None));
        assert!(conn.client_config().expect("client config").is_some());
    }

    #[test]
    fn test_plain_http_has_no_client_config() {
        let options = Options::builder().pem(CLIENT_PEM).build();
        let conn = ConnectionFactory::call(
            Address::parse("http://google.com").expect("valid address"),
            options,
        )
        .expect("connection");
        assert!(conn.cert().is_none());
        assert!(conn.client_config().expect("client config").is_none());
    }
}
