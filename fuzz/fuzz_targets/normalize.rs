#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    use nsauth::nameserver::normalize;
    if let Ok(s) = std::str::from_utf8(data) {
        let once = normalize(s);
        assert_eq!(once, normalize(&once));
    }
});
