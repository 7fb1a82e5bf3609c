#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    use nsauth::CheckRequest;
    use std::str::FromStr;
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = CheckRequest::from_str(s);
    }
});
