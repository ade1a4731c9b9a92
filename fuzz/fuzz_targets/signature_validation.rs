#![no_main]

//! Fuzz target for Slack request signature validation.
//!
//! Arbitrary header values and bodies must never panic the validator, and
//! must never validate unless the signature really matches.

use axum::http::{HeaderMap, HeaderValue};
use libfuzzer_sys::fuzz_target;
use youbou_api::crypto::{
    compute_signature, validate_request, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};

const SECRET: &str = "fuzz-signing-secret";

fuzz_target!(|data: &[u8]| {
    fuzz_signature_validation(data);
});

fn fuzz_signature_validation(data: &[u8]) {
    // Split the input into timestamp, signature and body.
    let mut parts = data.splitn(3, |&b| b == b'\n');
    let timestamp = parts.next().unwrap_or_default();
    let signature = parts.next().unwrap_or_default();
    let body = parts.next().unwrap_or_default();

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_bytes(timestamp) {
        headers.insert(TIMESTAMP_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_bytes(signature) {
        headers.insert(SIGNATURE_HEADER, value);
    }

    let result = validate_request(&headers, body, SECRET);

    if result.is_valid {
        let timestamp = std::str::from_utf8(timestamp).unwrap_or_default();
        let expected = compute_signature(timestamp, body, SECRET).unwrap_or_default();
        assert_eq!(expected.as_bytes(), signature);
    } else {
        assert!(result.error_message.is_some());
    }

    // Genuinely signed input always validates.
    if let Ok(timestamp) = std::str::from_utf8(timestamp) {
        if let (Ok(ts_value), Ok(signature)) =
            (HeaderValue::from_str(timestamp), compute_signature(timestamp, body, SECRET))
        {
            let mut signed = HeaderMap::new();
            signed.insert(TIMESTAMP_HEADER, ts_value);
            if let Ok(sig_value) = HeaderValue::from_str(&signature) {
                signed.insert(SIGNATURE_HEADER, sig_value);
                assert!(validate_request(&signed, body, SECRET).is_valid);
            }
        }
    }
}
