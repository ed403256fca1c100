#![no_main]

use httparty_connect::Address;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(addr) = Address::parse(data) {
        // A parsed address must render back into something that parses
        let rendered = addr.to_string();
        let reparsed = Address::parse(&rendered).expect("rendered address parses");
        assert_eq!(reparsed.scheme(), addr.scheme());
    }
});
