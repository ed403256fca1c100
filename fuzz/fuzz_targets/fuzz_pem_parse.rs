#![no_main]

use httparty_connect::{CertificateParser, PemParser};
use libfuzzer_sys::arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;

#[derive(Debug)]
struct PemInput {
    pem: Vec<u8>,
    password: Option<String>,
}

impl<'a> Arbitrary<'a> for PemInput {
    fn arbitrary(u: &mut Unstructured<'a>) -> libfuzzer_sys::arbitrary::Result<Self> {
        let pem: Vec<u8> = u.arbitrary()?;
        let password: Option<String> = u.arbitrary()?;
        Ok(Self { pem, password })
    }
}

fuzz_target!(|input: PemInput| {
    let _ = PemParser.parse_certificate(&input.pem);
    let _ = PemParser.parse_key(&input.pem, input.password.as_deref());
});
