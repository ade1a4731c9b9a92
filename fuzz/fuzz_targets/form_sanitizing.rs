#![no_main]

//! Fuzz target for submission text handling.
//!
//! Sanitized text must never contain markup brackets or keep more than the
//! allowed number of characters, and sealed ids must always open again.

use libfuzzer_sys::fuzz_target;
use youbou_core::{sanitize, IdentityVault, MAX_SUBMISSION_CHARS};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    let sanitized = sanitize(&text);
    assert!(!sanitized.contains('<'));
    assert!(!sanitized.contains('>'));

    let kept = text.chars().take(MAX_SUBMISSION_CHARS).collect::<String>();
    let expected = kept.replace('<', "&lt;").replace('>', "&gt;");
    assert_eq!(sanitized, expected);

    let vault = IdentityVault::generate();
    if let Ok(sealed) = vault.encrypt(&text) {
        assert_eq!(vault.decrypt(&sealed).ok().as_deref(), Some(text.as_ref()));
    }
});
