//! Strongly-typed identifiers and tally records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Chat channel identifier, e.g. `C1234567890`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl ChannelId {
    /// Creates a channel identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Platform-assigned message timestamp. Unique per channel, so it doubles as
/// the message key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTs(pub String);

impl MessageTs {
    /// Creates a message timestamp.
    pub fn new(ts: impl Into<String>) -> Self {
        Self(ts.into())
    }

    /// Returns the timestamp as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageTs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A submitter identifier sealed by the [`IdentityVault`](crate::IdentityVault).
///
/// Printable (URL-safe base64) and opaque. `Debug` shows only the length so
/// sealed values stay out of logs as well.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedUserId(String);

impl EncryptedUserId {
    /// Wraps an already-sealed value.
    pub fn new(sealed: impl Into<String>) -> Self {
        Self(sealed.into())
    }

    /// Returns the sealed value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EncryptedUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptedUserId(<{} chars>)", self.0.len())
    }
}

/// Vote count for one posted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// Message text as returned by the platform; `null` when absent
    pub text: Option<String>,
    /// Sum of all reaction counts on the message
    pub votes: u64,
}

/// Response body of the vote summary endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoteSummary {
    /// Tallies in the order the platform returned the messages
    pub summary: Vec<VoteTally>,
}
