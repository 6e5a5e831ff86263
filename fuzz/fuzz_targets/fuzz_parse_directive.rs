#![no_main]

use fieldguard::parse_directive;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    match parse_directive(raw) {
        Ok(directive) => {
            assert_eq!(directive.name, directive.name.trim());
            assert!(!directive.name.contains(':'));
            if let Some(param) = &directive.param {
                assert_eq!(param.as_str(), param.trim());
            }
        }
        Err(_) => assert!(raw.trim().is_empty()),
    }
});
