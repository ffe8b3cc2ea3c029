#![no_main]

use ara_headers::{Flags, HeaderOptions, SourceType, validate_header};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let flags = Flags::default();
    for options in [
        HeaderOptions::source(None),
        HeaderOptions::source(Some(SourceType::Event)),
        HeaderOptions::trigger(),
        HeaderOptions::redirect(),
    ] {
        let output = validate_header(&s, &flags, options);
        if output.is_valid() {
            // A valid document always serializes.
            let _ = ara_headers::to_pretty_json(&output.expected_value).unwrap();
        }
    }
});
