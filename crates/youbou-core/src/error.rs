//! Error taxonomy for the relay pipeline.
//!
//! Every failure a request can hit maps onto one variant here. The HTTP layer
//! decides status codes and response bodies from the variant; nothing in this
//! crate knows about HTTP.

use thiserror::Error;

/// Result type alias using `YoubouError`.
pub type Result<T> = std::result::Result<T, YoubouError>;

/// Errors produced while authenticating, validating, relaying or tallying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum YoubouError {
    // Request errors (E1001-E1004)
    /// Request signature was missing or did not match (E1001).
    #[error("[E1001] Authentication failed: request signature missing or invalid")]
    AuthenticationFailure,

    /// Request came from a channel other than the allowed one (E1002).
    #[error("[E1002] Authorization failed: channel {channel_id} is not allowed")]
    AuthorizationFailure {
        /// Channel the request claimed to come from
        channel_id: String,
    },

    /// A required form field was absent from the request body (E1003).
    #[error("[E1003] Missing form field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// The form body could not be decoded, e.g. a repeated field (E1004).
    #[error("[E1004] Malformed form body: {message}")]
    MalformedForm {
        /// Decoder error description
        message: String,
    },

    // Upstream errors (E2001)
    /// The chat platform rejected or failed the call (E2001).
    ///
    /// `message` is the upstream description and is passed to the caller
    /// verbatim.
    #[error("[E2001] Upstream error: {message}")]
    Upstream {
        /// Upstream error description
        message: String,
    },

    // Internal errors (E3001-E3004)
    /// Ciphertext was malformed, tampered with, or sealed by another key
    /// (E3001).
    #[error("[E3001] Decryption failed: ciphertext malformed or not sealed by this vault")]
    Decryption,

    /// The cipher refused to seal an identifier (E3002).
    #[error("[E3002] Encryption failed")]
    Encryption,

    /// Submission record store failure (E3003).
    #[error("[E3003] Storage error: {message}")]
    Storage {
        /// Store error description
        message: String,
    },

    /// Supplied vault key material is not a 32-byte key (E3004).
    #[error("[E3004] Invalid vault key material")]
    InvalidKey,
}

impl YoubouError {
    /// Creates an authorization failure for the given channel.
    pub fn wrong_channel(channel_id: impl Into<String>) -> Self {
        Self::AuthorizationFailure { channel_id: channel_id.into() }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }

    /// Creates a malformed form body error.
    pub fn malformed_form(message: impl Into<String>) -> Self {
        Self::MalformedForm { message: message.into() }
    }

    /// Creates an upstream error carrying the platform's message.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream { message: message.into() }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage { message: message.into() }
    }

    /// Returns the error code for this variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthenticationFailure => "E1001",
            Self::AuthorizationFailure { .. } => "E1002",
            Self::MissingField { .. } => "E1003",
            Self::MalformedForm { .. } => "E1004",
            Self::Upstream { .. } => "E2001",
            Self::Decryption => "E3001",
            Self::Encryption => "E3002",
            Self::Storage { .. } => "E3003",
            Self::InvalidKey => "E3004",
        }
    }

    /// Whether the request itself was at fault, as opposed to a collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailure
                | Self::AuthorizationFailure { .. }
                | Self::MissingField { .. }
                | Self::MalformedForm { .. }
        )
    }
}
