//! Slack Web API payloads.

use serde::{Deserialize, Serialize};
use youbou_core::{MessageTs, VoteTally};

/// Result of a successful `chat.postMessage` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    /// Timestamp Slack assigned to the new message
    pub ts: MessageTs,
}

/// A message from `conversations.history`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HistoryMessage {
    /// Message text; absent for some attachment-only messages
    #[serde(default)]
    pub text: Option<String>,
    /// Reactions; Slack omits the field when there are none
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl HistoryMessage {
    /// Sum of all reaction counts on this message, saturating at `u64::MAX`.
    pub fn vote_count(&self) -> u64 {
        self.reactions.iter().fold(0u64, |total, r| total.saturating_add(r.count))
    }

    /// Converts the message into its vote tally.
    pub fn into_tally(self) -> VoteTally {
        let votes = self.vote_count();
        VoteTally { text: self.text, votes }
    }
}

/// One emoji reaction entry on a message. Only the count matters to the
/// tally; the emoji name and reacting users are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reaction {
    /// Number of users who reacted with this emoji
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostMessageRequest<'a> {
    pub channel: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostMessageResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}

/// Error part of Slack's envelope, read from non-success responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub messages: Vec<HistoryMessage>,
}
