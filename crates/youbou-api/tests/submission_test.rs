//! Integration tests for the `/post_request` relay endpoint.
//!
//! Requests go through the full router against a fake Slack API, so each
//! scenario checks the HTTP response, what reached Slack and what was
//! recorded.

use anyhow::Result;
use axum::http::StatusCode;
use youbou_core::MessageTs;
use youbou_testing::{
    slack_signature, SubmissionForm, TestEnv, TARGET_CHANNEL, TEST_SIGNING_SECRET, TEST_TIMESTAMP,
    WRONG_CHANNEL,
};

/// A signed submission from the allowed channel is posted with its label and
/// recorded under the timestamp Slack returned.
#[tokio::test]
async fn valid_submission_is_posted_and_recorded() -> Result<()> {
    let env = TestEnv::new().await?;
    env.slack.mock_post_message("1700000000.000100").await;

    let body = SubmissionForm::new("U111", "need more snacks").encode();
    let response = env.post_request(&body).await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "要望を投稿しました！");

    let posts = env.slack.posted_messages().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["channel"], TARGET_CHANNEL);
    assert_eq!(posts[0]["text"], "要望: need more snacks");

    let records = env.store.snapshot().await;
    assert_eq!(records.len(), 1);
    let sealed = &records[&MessageTs::new("1700000000.000100")];
    assert_ne!(sealed.as_str(), "U111");
    assert_eq!(env.vault.decrypt(sealed)?, "U111");

    Ok(())
}

/// The posted text never carries the submitter's id.
#[tokio::test]
async fn posted_message_does_not_reveal_submitter() -> Result<()> {
    let env = TestEnv::new().await?;
    env.slack.mock_post_message("1700000000.000200").await;

    let body = SubmissionForm::new("U_SECRET_42", "quiet hours after 22:00").encode();
    env.post_request(&body).await?;

    let posts = env.slack.posted_messages().await;
    assert!(!posts[0].to_string().contains("U_SECRET_42"));

    Ok(())
}

/// Markup characters are escaped and long text is cut before posting.
#[tokio::test]
async fn submission_text_is_sanitized() -> Result<()> {
    let env = TestEnv::new().await?;
    env.slack.mock_post_message("1700000000.000300").await;

    let long_text = format!("<@U999> {}", "あ".repeat(300));
    let body = SubmissionForm::new("U111", long_text).encode();
    let response = env.post_request(&body).await?;
    assert_eq!(response.status, StatusCode::OK);

    let posts = env.slack.posted_messages().await;
    let text = posts[0]["text"].as_str().unwrap_or_default();
    assert!(text.starts_with("要望: &lt;@U999&gt; "));
    assert!(!text.contains('<') && !text.contains('>'));

    let unescaped = text.trim_start_matches("要望: ").replace("&lt;", "<").replace("&gt;", ">");
    assert_eq!(unescaped.chars().count(), 200);

    Ok(())
}

/// Requests from any other channel are refused before anything is posted.
#[tokio::test]
async fn wrong_channel_is_refused_without_side_effects() -> Result<()> {
    let env = TestEnv::new().await?;
    env.slack.mock_post_message("1700000000.000400").await;

    let body = SubmissionForm::new("U111", "hi").channel(WRONG_CHANNEL).encode();
    let response = env.post_request(&body).await?;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body, "このコマンドは特定のチャンネルでのみ使用できます。");
    env.slack.assert_post_count(0).await;
    assert!(env.store.snapshot().await.is_empty());

    Ok(())
}

/// A bad signature is refused before the channel is even looked at.
#[tokio::test]
async fn invalid_signature_is_refused() -> Result<()> {
    let env = TestEnv::new().await?;
    env.slack.mock_post_message("1700000000.000500").await;

    // Wrong channel too: the signature failure must win.
    let body = SubmissionForm::new("U111", "hi").channel(WRONG_CHANNEL).encode();
    let forged = format!("v0={}", "0".repeat(64));
    let response = env.post_request_with_signature(&body, TEST_TIMESTAMP, &forged).await?;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body, "Unauthorized request");
    env.slack.assert_post_count(0).await;
    assert!(env.store.snapshot().await.is_empty());

    Ok(())
}

/// A signature for one body does not authenticate another.
#[tokio::test]
async fn signature_over_different_body_is_refused() -> Result<()> {
    let env = TestEnv::new().await?;
    env.slack.mock_post_message("1700000000.000600").await;

    let signed_body = SubmissionForm::new("U111", "hi").encode();
    let signature = slack_signature(TEST_SIGNING_SECRET, TEST_TIMESTAMP, signed_body.as_bytes());
    let sent_body = SubmissionForm::new("U111", "something else").encode();

    let response = env.post_request_with_signature(&sent_body, TEST_TIMESTAMP, &signature).await?;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    env.slack.assert_post_count(0).await;

    Ok(())
}

/// Missing signature headers are treated as an invalid signature.
#[tokio::test]
async fn unsigned_submission_is_refused() -> Result<()> {
    let env = TestEnv::new().await?;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/post_request")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(axum::body::Body::from(SubmissionForm::new("U111", "hi").encode()))?;
    let response = env.send(request).await?;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body, "Unauthorized request");

    Ok(())
}

/// Slack refusing the post surfaces as 400 with Slack's error code, and
/// nothing is recorded.
#[tokio::test]
async fn slack_error_is_reported_and_nothing_recorded() -> Result<()> {
    let env = TestEnv::new().await?;
    env.slack.mock_post_message_error("not_in_channel").await;

    let body = SubmissionForm::new("U111", "hi").encode();
    let response = env.post_request(&body).await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "Error: not_in_channel");
    assert!(env.store.snapshot().await.is_empty());

    Ok(())
}

/// An unavailable Slack API is reported as a client-visible upstream error.
#[tokio::test]
async fn slack_outage_is_reported() -> Result<()> {
    let env = TestEnv::new().await?;
    env.slack.mock_always_fail(503).await;

    let body = SubmissionForm::new("U111", "hi").encode();
    let response = env.post_request(&body).await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.starts_with("Error: "));
    assert!(env.store.snapshot().await.is_empty());

    Ok(())
}

/// Rate limiting relays Slack's own error code, not the HTTP status.
#[tokio::test]
async fn rate_limited_post_reports_slack_error_code() -> Result<()> {
    let env = TestEnv::new().await?;
    env.slack.mock_rate_limited().await;

    let body = SubmissionForm::new("U111", "hi").encode();
    let response = env.post_request(&body).await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body, "Error: ratelimited");
    assert!(env.store.snapshot().await.is_empty());

    Ok(())
}

/// A repeated field is reported as a malformed body, not a missing one.
#[tokio::test]
async fn repeated_field_is_rejected_as_malformed() -> Result<()> {
    let env = TestEnv::new().await?;
    env.slack.mock_post_message("1700000000.000600").await;

    let body = format!("{}&text=again", SubmissionForm::new("U111", "hi").encode());
    let response = env.post_request(&body).await?;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.starts_with("Malformed form body: "), "body: {}", response.body);
    assert!(response.body.contains("text"));
    env.slack.assert_post_count(0).await;

    Ok(())
}

/// Each required field is checked.
#[tokio::test]
async fn missing_fields_are_rejected() -> Result<()> {
    let env = TestEnv::new().await?;
    env.slack.mock_post_message("1700000000.000700").await;

    let cases = [
        (SubmissionForm::new("U111", "hi").without_user_id(), "user_id"),
        (SubmissionForm::new("U111", "hi").without_text(), "text"),
        (SubmissionForm::new("U111", "hi").without_channel(), "channel_id"),
    ];

    for (form, field) in cases {
        let response = env.post_request(&form.encode()).await?;

        assert_eq!(response.status, StatusCode::BAD_REQUEST, "missing {field}");
        assert_eq!(response.body, format!("Missing form field: {field}"));
    }

    env.slack.assert_post_count(0).await;
    Ok(())
}

/// A repeated message timestamp keeps the latest submitter.
#[tokio::test]
async fn repeated_timestamp_keeps_latest_submitter() -> Result<()> {
    let env = TestEnv::new().await?;
    env.slack.mock_post_message("1700000000.000800").await;

    // The fake API answers every post with the same ts.
    for user in ["U1", "U2"] {
        let body = SubmissionForm::new(user, "hi").encode();
        assert_eq!(env.post_request(&body).await?.status, StatusCode::OK);
    }

    env.slack.assert_post_count(2).await;
    let records = env.store.snapshot().await;
    assert_eq!(records.len(), 1);
    let sealed = &records[&MessageTs::new("1700000000.000800")];
    assert_eq!(env.vault.decrypt(sealed)?, "U2");

    Ok(())
}

/// Every response carries a request id.
#[tokio::test]
async fn responses_carry_request_id() -> Result<()> {
    let env = TestEnv::new().await?;

    let response = env.post_request_with_signature("", TEST_TIMESTAMP, "v0=bad").await?;

    let request_id = response.headers.get("x-request-id").expect("request id header");
    assert_eq!(request_id.to_str()?.len(), 36);

    Ok(())
}
