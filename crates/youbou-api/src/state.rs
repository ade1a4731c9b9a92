//! Shared application state injected into every handler.

use std::sync::Arc;

use anyhow::Context;
use youbou_core::{ChannelId, IdentityVault, InMemorySubmissionStore, SubmissionStore};
use youbou_slack::{ChatPlatform, SlackClient};

use crate::{config::Config, crypto::SigningSecret};

/// Channel rules: which channel may call in, and where submissions go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPolicy {
    /// The only channel allowed to invoke the endpoints
    pub allowed_channel_id: ChannelId,
    /// Channel posts are sent to and history is read from
    pub target_channel: String,
}

impl ChannelPolicy {
    /// Whether a request claiming `channel_id` may proceed.
    pub fn permits(&self, channel_id: &str) -> bool {
        self.allowed_channel_id.as_str() == channel_id
    }
}

/// Collaborators built once at startup and shared by all requests.
#[derive(Clone)]
pub struct AppState {
    /// Chat platform client
    pub chat: Arc<dyn ChatPlatform>,
    /// Submission record store
    pub store: Arc<dyn SubmissionStore>,
    /// Identity vault holding the process-lifetime key
    pub vault: Arc<IdentityVault>,
    /// Secret for request signature verification
    pub signing_secret: SigningSecret,
    /// Channel rules
    pub channels: Arc<ChannelPolicy>,
}

impl AppState {
    /// Assembles state from explicit collaborators.
    pub fn new(
        chat: Arc<dyn ChatPlatform>,
        store: Arc<dyn SubmissionStore>,
        vault: Arc<IdentityVault>,
        signing_secret: SigningSecret,
        channels: ChannelPolicy,
    ) -> Self {
        Self { chat, store, vault, signing_secret, channels: Arc::new(channels) }
    }

    /// Builds production state: Slack client, in-memory store and the
    /// identity vault.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built or the configured vault key
    /// is invalid.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let chat = SlackClient::new(config.to_client_config()).context("Failed to build Slack client")?;
        let vault = config.identity_vault()?;

        Ok(Self::new(
            Arc::new(chat),
            Arc::new(InMemorySubmissionStore::new()),
            Arc::new(vault),
            SigningSecret::new(config.slack_signing_secret.clone()),
            config.channel_policy(),
        ))
    }
}
