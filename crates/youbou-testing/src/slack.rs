//! Fake Slack Web API backed by wiremock.

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, Request, ResponseTemplate,
};

use crate::fixtures::{TARGET_CHANNEL, TEST_BOT_TOKEN};

const POST_MESSAGE_PATH: &str = "/chat.postMessage";
const HISTORY_PATH: &str = "/conversations.history";

/// Fake Slack API. Point a `SlackClient` at [`MockSlackApi::url`].
pub struct MockSlackApi {
    server: MockServer,
}

impl MockSlackApi {
    /// Starts a new fake API on a random port.
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    /// Returns the base URL of the fake API.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Makes `chat.postMessage` succeed with the given timestamp.
    ///
    /// Only requests carrying the test bot token match.
    pub async fn mock_post_message(&self, ts: &str) {
        Mock::given(method("POST"))
            .and(path(POST_MESSAGE_PATH))
            .and(header("authorization", format!("Bearer {TEST_BOT_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "channel": "C0TARGET",
                "ts": ts,
            })))
            .mount(&self.server)
            .await;
    }

    /// Makes `chat.postMessage` answer `ok: false` with the given code.
    pub async fn mock_post_message_error(&self, error: &str) {
        Mock::given(method("POST"))
            .and(path(POST_MESSAGE_PATH))
            .respond_with(ok_false(error))
            .mount(&self.server)
            .await;
    }

    /// Makes `conversations.history` of the target channel return `messages`.
    pub async fn mock_history(&self, messages: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path(HISTORY_PATH))
            .and(query_param("channel", TARGET_CHANNEL))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": true, "messages": messages})),
            )
            .mount(&self.server)
            .await;
    }

    /// Makes `conversations.history` answer `ok: false` with the given code.
    pub async fn mock_history_error(&self, error: &str) {
        Mock::given(method("GET"))
            .and(path(HISTORY_PATH))
            .respond_with(ok_false(error))
            .mount(&self.server)
            .await;
    }

    /// Makes every call answer 429 with Slack's `ratelimited` envelope.
    pub async fn mock_rate_limited(&self) {
        Mock::given(wiremock::matchers::any())
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "30")
                    .set_body_json(json!({"ok": false, "error": "ratelimited"})),
            )
            .mount(&self.server)
            .await;
    }

    /// Makes every call fail with the given HTTP status.
    pub async fn mock_always_fail(&self, status: u16) {
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Returns the JSON bodies of all `chat.postMessage` calls received.
    pub async fn posted_messages(&self) -> Vec<Value> {
        self.requests_to(POST_MESSAGE_PATH)
            .await
            .iter()
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }

    /// Returns how many `conversations.history` calls were received.
    pub async fn history_fetches(&self) -> usize {
        self.requests_to(HISTORY_PATH).await.len()
    }

    /// Asserts that exactly `expected` messages were posted.
    pub async fn assert_post_count(&self, expected: usize) {
        let posts = self.posted_messages().await;
        assert_eq!(
            posts.len(),
            expected,
            "Expected {} posted messages, received {}",
            expected,
            posts.len()
        );
    }

    async fn requests_to(&self, endpoint: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == endpoint)
            .collect()
    }
}

fn ok_false(error: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"ok": false, "error": error}))
}

/// Builds a `conversations.history` message with one reaction per count.
pub fn history_message(text: &str, reaction_counts: &[u64]) -> Value {
    let reactions: Vec<Value> = reaction_counts
        .iter()
        .enumerate()
        .map(|(i, count)| json!({"name": format!("emoji_{i}"), "users": [], "count": count}))
        .collect();

    if reactions.is_empty() {
        json!({"type": "message", "text": text, "ts": "1700000000.000001"})
    } else {
        json!({"type": "message", "text": text, "ts": "1700000000.000001", "reactions": reactions})
    }
}
