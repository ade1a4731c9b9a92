//! Test infrastructure for the relay.
//!
//! [`TestEnv`] wires the real router to a wiremock-backed fake Slack API, an
//! inspectable in-memory store and a fresh identity vault. Requests go
//! through the full middleware stack via `tower::ServiceExt::oneshot`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    Router,
};
use http::{Method, Request, StatusCode};
use tower::ServiceExt;
use youbou_api::{crypto::SigningSecret, create_router, AppState, ChannelPolicy};
use youbou_core::{ChannelId, IdentityVault, InMemorySubmissionStore};
use youbou_slack::{ClientConfig, SlackClient};

pub mod fixtures;
pub mod slack;

pub use fixtures::{
    slack_signature, summary_form, SubmissionForm, ALLOWED_CHANNEL, TARGET_CHANNEL, TEST_BOT_TOKEN,
    TEST_SIGNING_SECRET, TEST_TIMESTAMP, WRONG_CHANNEL,
};
pub use slack::{history_message, MockSlackApi};

/// Response as seen by a test: status, headers and body text.
#[derive(Debug)]
pub struct TestResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Body decoded as UTF-8
    pub body: String,
}

impl TestResponse {
    /// Parses the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Test environment with a fake Slack API behind the real router.
pub struct TestEnv {
    /// Fake Slack Web API
    pub slack: MockSlackApi,
    /// Store the router records into
    pub store: Arc<InMemorySubmissionStore>,
    /// Vault the router seals user ids with
    pub vault: Arc<IdentityVault>,
    state: AppState,
}

impl TestEnv {
    /// Starts the fake Slack API and builds application state against it.
    pub async fn new() -> Result<Self> {
        let slack = MockSlackApi::start().await;
        let chat = SlackClient::new(
            ClientConfig::new(TEST_BOT_TOKEN)
                .with_base_url(slack.url())
                .with_timeout(Duration::from_secs(5)),
        )?;

        let store = Arc::new(InMemorySubmissionStore::new());
        let vault = Arc::new(IdentityVault::generate());
        let state = AppState::new(
            Arc::new(chat),
            store.clone(),
            vault.clone(),
            SigningSecret::new(TEST_SIGNING_SECRET),
            ChannelPolicy {
                allowed_channel_id: ChannelId::new(ALLOWED_CHANNEL),
                target_channel: TARGET_CHANNEL.to_string(),
            },
        );

        Ok(Self { slack, store, vault, state })
    }

    /// Returns a clone of the application state.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Builds a router over this environment's state.
    pub fn router(&self) -> Router {
        create_router(self.state(), Duration::from_secs(30))
    }

    /// Sends a correctly signed `POST /post_request`.
    pub async fn post_request(&self, body: &str) -> Result<TestResponse> {
        let signature = slack_signature(TEST_SIGNING_SECRET, TEST_TIMESTAMP, body.as_bytes());
        self.post_request_with_signature(body, TEST_TIMESTAMP, &signature).await
    }

    /// Sends `POST /post_request` with explicit signature headers.
    pub async fn post_request_with_signature(
        &self,
        body: &str,
        timestamp: &str,
        signature: &str,
    ) -> Result<TestResponse> {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/post_request")
            .header("content-type", "application/x-www-form-urlencoded")
            .header("x-slack-request-timestamp", timestamp)
            .header("x-slack-signature", signature)
            .body(Body::from(body.to_string()))?;

        self.send(request).await
    }

    /// Sends `GET /vote_summary` with a form body and no signature.
    pub async fn vote_summary(&self, body: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/vote_summary")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))?;

        self.send(request).await
    }

    /// Sends `GET /health`.
    pub async fn health(&self) -> Result<TestResponse> {
        let request = Request::builder().uri("/health").body(Body::empty())?;
        self.send(request).await
    }

    /// Sends an arbitrary request through the router.
    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router().oneshot(request).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;

        Ok(TestResponse { status, headers, body: String::from_utf8(bytes.to_vec())? })
    }
}
