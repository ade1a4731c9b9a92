//! Reaction tally for relayed submissions.
//!
//! `GET /vote_summary` reads `channel_id` from a form-encoded body, the way
//! Slack invokes it, and sums the reaction counts of every message in the
//! target channel's recent history.
//!
//! This route checks the calling channel but does not verify the request
//! signature. Anyone who knows the allowed channel id can read the tally.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};
use youbou_core::{Result, VoteSummary, YoubouError};
use youbou_slack::HistoryMessage;

use super::{error_response, parse_form, required};
use crate::AppState;

#[derive(Debug, Deserialize)]
struct SummaryForm {
    channel_id: Option<String>,
}

/// Returns the reaction tally of the target channel as JSON.
///
/// Returns:
/// - 200: `{"summary": [{"text": .., "votes": ..}, ..]}` in history order
/// - 403: wrong channel
/// - 400: missing `channel_id` or chat platform error
#[instrument(name = "vote_summary", skip_all)]
pub async fn vote_summary(State(state): State<AppState>, body: Bytes) -> Response {
    match summarize_votes(&state, &body).await {
        Ok(summary) => {
            info!(messages = summary.summary.len(), "Vote summary served");
            (StatusCode::OK, Json(summary)).into_response()
        },
        Err(e) => {
            if e.is_client_error() {
                warn!(code = e.code(), error = %e, "Vote summary rejected");
            } else {
                error!(code = e.code(), error = %e, "Vote summary failed");
            }
            error_response(&e)
        },
    }
}

/// Checks the calling channel and tallies the target channel's history.
///
/// # Errors
///
/// - `MissingField` if `channel_id` is absent
/// - `AuthorizationFailure` for any channel but the allowed one
/// - `Upstream` if the history cannot be fetched
pub async fn summarize_votes(state: &AppState, body: &[u8]) -> Result<VoteSummary> {
    let form: SummaryForm = parse_form(body)?;
    let channel_id = required(form.channel_id, "channel_id")?;

    if !state.channels.permits(&channel_id) {
        return Err(YoubouError::wrong_channel(channel_id));
    }

    let history = state.chat.fetch_history(&state.channels.target_channel).await?;

    Ok(VoteSummary { summary: history.into_iter().map(HistoryMessage::into_tally).collect() })
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;
    use youbou_core::{ChannelId, IdentityVault, InMemorySubmissionStore, MessageTs};
    use youbou_slack::{ChatPlatform, PostedMessage, Reaction, SlackError};

    use super::*;
    use crate::{crypto::SigningSecret, state::ChannelPolicy};

    struct FixedHistory {
        messages: Vec<HistoryMessage>,
        fail_with: Option<SlackError>,
        fetches: AtomicUsize,
    }

    impl FixedHistory {
        fn new(messages: Vec<HistoryMessage>) -> Self {
            Self { messages, fail_with: None, fetches: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl ChatPlatform for FixedHistory {
        async fn post_message(&self, _channel: &str, _text: &str) -> youbou_slack::Result<PostedMessage> {
            Ok(PostedMessage { ts: MessageTs::new("1700000000.000001") })
        }

        async fn fetch_history(&self, _channel: &str) -> youbou_slack::Result<Vec<HistoryMessage>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(error) => Err(error.clone()),
                None => Ok(self.messages.clone()),
            }
        }
    }

    fn state_with(chat: Arc<FixedHistory>) -> AppState {
        AppState::new(
            chat,
            Arc::new(InMemorySubmissionStore::new()),
            Arc::new(IdentityVault::generate()),
            SigningSecret::new("unused"),
            ChannelPolicy {
                allowed_channel_id: ChannelId::new("C1234567890"),
                target_channel: "#合宿要望".to_string(),
            },
        )
    }

    fn message(text: &str, counts: &[u64]) -> HistoryMessage {
        HistoryMessage {
            text: Some(text.to_string()),
            reactions: counts
                .iter()
                .map(|&count| Reaction { count })
                .collect(),
        }
    }

    #[tokio::test]
    async fn sums_reactions_in_history_order() {
        let chat = Arc::new(FixedHistory::new(vec![
            message("要望: A", &[3]),
            message("要望: B", &[]),
            message("要望: C", &[2, 5]),
        ]));
        let state = state_with(chat);

        let summary = summarize_votes(&state, b"channel_id=C1234567890").await.unwrap();

        let votes: Vec<(Option<&str>, u64)> =
            summary.summary.iter().map(|t| (t.text.as_deref(), t.votes)).collect();
        assert_eq!(votes, vec![(Some("要望: A"), 3), (Some("要望: B"), 0), (Some("要望: C"), 7)]);
    }

    #[tokio::test]
    async fn wrong_channel_does_not_fetch_history() {
        let chat = Arc::new(FixedHistory::new(vec![message("A", &[1])]));
        let state = state_with(chat.clone());

        let error = summarize_votes(&state, b"channel_id=C_WRONG").await.unwrap_err();

        assert_eq!(error, YoubouError::wrong_channel("C_WRONG"));
        assert_eq!(chat.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unsigned_request_is_served() {
        let chat = Arc::new(FixedHistory::new(Vec::new()));
        let state = state_with(chat);

        let summary = summarize_votes(&state, b"channel_id=C1234567890").await.unwrap();
        assert!(summary.summary.is_empty());
    }

    #[tokio::test]
    async fn missing_channel_is_rejected() {
        let state = state_with(Arc::new(FixedHistory::new(Vec::new())));

        let error = summarize_votes(&state, b"").await.unwrap_err();
        assert_eq!(error, YoubouError::missing_field("channel_id"));
    }

    #[tokio::test]
    async fn upstream_failure_is_passed_through() {
        let chat = Arc::new(FixedHistory {
            fail_with: Some(SlackError::api("channel_not_found")),
            ..FixedHistory::new(Vec::new())
        });
        let state = state_with(chat);

        let error = summarize_votes(&state, b"channel_id=C1234567890").await.unwrap_err();
        assert_eq!(error, YoubouError::upstream("channel_not_found"));
    }
}
