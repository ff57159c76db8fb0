#![no_main]

use libfuzzer_sys::fuzz_target;
use preconcat_core::extract::extract_dependencies;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    for id in extract_dependencies(content) {
        assert!(!id.is_empty());
        assert!(!id.starts_with('.') && !id.ends_with('.'));
        assert!(content.contains(id.as_str()));
    }
});
