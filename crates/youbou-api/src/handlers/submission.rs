//! Anonymous submission relay.
//!
//! `POST /post_request` runs a fixed pipeline and stops at the first failed
//! gate:
//!
//! 1. Verify the Slack signature over the raw body
//! 2. Read `user_id`, `text` and `channel_id`; seal the user id and sanitize
//!    the text
//! 3. Check the channel against the allowed one
//! 4. Post the labelled text to the target channel
//! 5. Record `{ts -> sealed user id}`
//!
//! A request rejected at any gate leaves no trace: nothing is posted and
//! nothing is recorded.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};
use youbou_core::{sanitize, MessageTs, Result, YoubouError};

use super::{error_response, parse_form, required, SUBMISSION_ACCEPTED_MESSAGE, SUBMISSION_LABEL};
use crate::{crypto::validate_request, AppState};

/// Slash-command fields the relay reads. Slack sends many more; they are
/// ignored.
#[derive(Debug, Deserialize)]
struct SubmissionForm {
    user_id: Option<String>,
    text: Option<String>,
    channel_id: Option<String>,
}

/// Relays an anonymous submission to the target channel.
///
/// Returns:
/// - 200: posted and recorded
/// - 403: bad signature or wrong channel
/// - 400: missing field or chat platform error
#[instrument(name = "post_request", skip_all, fields(content_length = body.len()))]
pub async fn post_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match relay_submission(&state, &headers, &body).await {
        Ok(ts) => {
            info!(ts = %ts, "Submission relayed");
            (StatusCode::OK, SUBMISSION_ACCEPTED_MESSAGE).into_response()
        },
        Err(e) => {
            if e.is_client_error() {
                warn!(code = e.code(), error = %e, "Submission rejected");
            } else {
                error!(code = e.code(), error = %e, "Submission failed");
            }
            error_response(&e)
        },
    }
}

/// Runs the relay pipeline and returns the timestamp of the posted message.
///
/// # Errors
///
/// - `AuthenticationFailure` before anything else is read
/// - `MissingField` if a required field is absent
/// - `AuthorizationFailure` for any channel but the allowed one
/// - `Upstream` if posting fails; nothing is recorded in that case
pub async fn relay_submission(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<MessageTs> {
    let validation = validate_request(headers, body, state.signing_secret.expose());
    if !validation.is_valid {
        debug!(reason = ?validation.error_message, "Signature validation failed");
        return Err(YoubouError::AuthenticationFailure);
    }

    let form: SubmissionForm = parse_form(body)?;
    let user_id = required(form.user_id, "user_id")?;
    let text = required(form.text, "text")?;
    let channel_id = required(form.channel_id, "channel_id")?;

    let submitter = state.vault.encrypt(&user_id)?;
    let text = sanitize(&text);

    if !state.channels.permits(&channel_id) {
        return Err(YoubouError::wrong_channel(channel_id));
    }

    let message = format!("{SUBMISSION_LABEL}{text}");
    let posted = state.chat.post_message(&state.channels.target_channel, &message).await?;

    state.store.record(posted.ts.clone(), submitter).await?;
    debug!(ts = %posted.ts, "Submitter recorded");

    Ok(posted.ts)
}
