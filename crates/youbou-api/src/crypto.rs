//! Slack request signature validation.
//!
//! Slack signs every webhook call with the app's signing secret:
//!
//! ```text
//! X-Slack-Signature = "v0=" + hex(HMAC-SHA256(secret, "v0:" + timestamp + ":" + body))
//! ```
//!
//! where `timestamp` is the `X-Slack-Request-Timestamp` header and `body` is
//! the raw request body. A request is genuine only if the provided signature
//! equals the recomputed one.

use std::fmt;

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Signature scheme version prefix.
pub const SIGNATURE_VERSION: &str = "v0";

/// Header carrying the request timestamp.
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Shared signing secret. Wiped from memory on drop; `Debug` is redacted.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<String>);

impl SigningSecret {
    /// Wraps a signing secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    /// Returns the secret for MAC computation.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(***)")
    }
}

/// Result of signature validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the signature is valid.
    pub is_valid: bool,
    /// Error message if validation failed.
    pub error_message: Option<String>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn valid() -> Self {
        Self { is_valid: true, error_message: None }
    }

    /// Creates a failed validation result with error message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self { is_valid: false, error_message: Some(message.into()) }
    }
}

/// Signature validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// Required header missing.
    MissingHeader(&'static str),
    /// Header present but not valid visible ASCII.
    InvalidHeader(&'static str),
    /// Signature verification failed.
    VerificationFailed,
    /// Secret rejected by the MAC.
    InvalidSecret,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader(name) => write!(f, "{name} header missing"),
            Self::InvalidHeader(name) => write!(f, "{name} header is not valid text"),
            Self::VerificationFailed => write!(f, "signature verification failed"),
            Self::InvalidSecret => write!(f, "invalid secret key"),
        }
    }
}

impl std::error::Error for SignatureError {}

/// Computes the expected `v0=<hex>` signature for a request.
///
/// Deterministic in its three inputs.
///
/// # Errors
///
/// Returns `SignatureError::InvalidSecret` if the MAC rejects the key.
///
/// # Example
///
/// ```
/// use youbou_api::crypto::compute_signature;
///
/// let signature = compute_signature("1531420618", b"token=xyz", "secret").unwrap();
/// assert!(signature.starts_with("v0="));
/// assert_eq!(signature.len(), 3 + 64);
/// ```
pub fn compute_signature(timestamp: &str, body: &[u8], secret: &str) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidSecret)?;

    mac.update(SIGNATURE_VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);

    Ok(format!("{SIGNATURE_VERSION}={}", hex::encode(mac.finalize().into_bytes())))
}

/// Checks a provided signature against the one computed from the request.
///
/// Comparison is constant-time in the signature contents.
pub fn verify_signature(timestamp: &str, body: &[u8], secret: &str, provided: &str) -> bool {
    match compute_signature(timestamp, body, secret) {
        Ok(expected) => timing_safe_eq(&expected, provided),
        Err(_) => false,
    }
}

/// Validates a Slack request from its headers and raw body.
///
/// Missing or unreadable headers fail validation; nothing is inferred.
pub fn validate_request(headers: &HeaderMap, body: &[u8], secret: &str) -> ValidationResult {
    let timestamp = match header_str(headers, TIMESTAMP_HEADER) {
        Ok(value) => value,
        Err(err) => return ValidationResult::invalid(err.to_string()),
    };

    let provided = match header_str(headers, SIGNATURE_HEADER) {
        Ok(value) => value,
        Err(err) => return ValidationResult::invalid(err.to_string()),
    };

    if verify_signature(timestamp, body, secret, provided) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid(SignatureError::VerificationFailed.to_string())
    }
}

/// Returns whether a request genuinely came from Slack.
pub fn verify_slack_request(headers: &HeaderMap, body: &[u8], secret: &str) -> bool {
    validate_request(headers, body, secret).is_valid
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, SignatureError> {
    headers
        .get(name)
        .ok_or(SignatureError::MissingHeader(name))?
        .to_str()
        .map_err(|_| SignatureError::InvalidHeader(name))
}

/// Timing-safe string comparison to prevent timing attacks.
///
/// Uses constant-time comparison to avoid leaking information
/// about the expected signature through timing analysis.
fn timing_safe_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.bytes().zip(b.bytes()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}
