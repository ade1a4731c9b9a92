//! Error types for Slack API calls.

use thiserror::Error;
use youbou_core::YoubouError;

/// Result type alias for Slack API operations.
pub type Result<T> = std::result::Result<T, SlackError>;

/// Failures talking to the Slack Web API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlackError {
    /// Slack answered `"ok": false`. Displays the raw error code, e.g.
    /// `channel_not_found`.
    #[error("{error}")]
    Api {
        /// Error code reported by Slack
        error: String,
    },

    /// Non-success HTTP status from the API.
    #[error("HTTP {status_code} from Slack API")]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Response body content
        body: String,
    },

    /// Network-level connectivity failure.
    #[error("network connection failed: {message}")]
    Network {
        /// Error message describing the network failure
        message: String,
    },

    /// HTTP request timeout exceeded.
    #[error("request timeout after {timeout_seconds}s")]
    Timeout {
        /// Number of seconds before the request timed out
        timeout_seconds: u64,
    },

    /// Response body could not be understood.
    #[error("invalid Slack API response: {message}")]
    InvalidResponse {
        /// Decode error message
        message: String,
    },

    /// Client could not be built from its configuration.
    #[error("invalid client configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl SlackError {
    /// Creates an API error from Slack's error code.
    pub fn api(error: impl Into<String>) -> Self {
        Self::Api { error: error.into() }
    }

    /// Creates a network error from a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_seconds: u64) -> Self {
        Self::Timeout { timeout_seconds }
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse { message: message.into() }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }
}

impl From<SlackError> for YoubouError {
    fn from(error: SlackError) -> Self {
        Self::upstream(error.to_string())
    }
}
