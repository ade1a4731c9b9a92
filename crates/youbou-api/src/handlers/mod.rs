//! HTTP request handlers.
//!
//! - `submission` - `POST /post_request`, the anonymous relay
//! - `summary` - `GET /vote_summary`, the reaction tally
//! - `health` - `GET /health`
//!
//! Bodies are Slack slash-command payloads (`application/x-www-form-urlencoded`)
//! read as raw bytes, because the signature covers the exact bytes received.
//! Error responses are plain text; the mapping from [`YoubouError`] to status
//! and body lives in [`error_response`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use youbou_core::{Result, YoubouError};

pub mod health;
pub mod submission;
pub mod summary;

pub use health::health_check;
pub use submission::post_request;
pub use summary::vote_summary;

/// Body returned when signature verification fails.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized request";

/// Body returned when the request comes from another channel.
pub const WRONG_CHANNEL_MESSAGE: &str = "このコマンドは特定のチャンネルでのみ使用できます。";

/// Body returned after a submission is relayed.
pub const SUBMISSION_ACCEPTED_MESSAGE: &str = "要望を投稿しました！";

/// Prefix put in front of every relayed submission.
pub const SUBMISSION_LABEL: &str = "要望: ";

/// Decodes a form-encoded body.
fn parse_form<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_urlencoded::from_bytes(body).map_err(|e| YoubouError::malformed_form(e.to_string()))
}

/// Unwraps a form field the handler cannot proceed without.
fn required(value: Option<String>, field: &'static str) -> Result<String> {
    value.ok_or_else(|| YoubouError::missing_field(field))
}

/// Creates the plain-text response for an error.
pub fn error_response(error: &YoubouError) -> Response {
    let (status, body) = match error {
        YoubouError::AuthenticationFailure => {
            (StatusCode::FORBIDDEN, UNAUTHORIZED_MESSAGE.to_string())
        },
        YoubouError::AuthorizationFailure { .. } => {
            (StatusCode::FORBIDDEN, WRONG_CHANNEL_MESSAGE.to_string())
        },
        YoubouError::MissingField { field } => {
            (StatusCode::BAD_REQUEST, format!("Missing form field: {field}"))
        },
        YoubouError::MalformedForm { message } => {
            (StatusCode::BAD_REQUEST, format!("Malformed form body: {message}"))
        },
        YoubouError::Upstream { message } => (StatusCode::BAD_REQUEST, format!("Error: {message}")),
        YoubouError::Decryption
        | YoubouError::Encryption
        | YoubouError::Storage { .. }
        | YoubouError::InvalidKey => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
        },
    };

    (status, body).into_response()
}
