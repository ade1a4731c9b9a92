//! Configuration management for the relay service.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use youbou_core::{ChannelId, IdentityVault};
use youbou_slack::ClientConfig;

use crate::state::ChannelPolicy;

const CONFIG_FILE: &str = "config.toml";

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// The Slack bot token and signing secret have no usable default and must be
/// provided by one of the first two sources.
///
/// # Example
///
/// ```no_run
/// use youbou_api::Config;
///
/// let config = Config::load().expect("Failed to load configuration");
///
/// println!("Server will bind to {}:{}", config.host, config.port);
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    // Slack
    /// Bot token used for Web API calls.
    ///
    /// Environment variable: `SLACK_BOT_TOKEN`
    #[serde(default, alias = "SLACK_BOT_TOKEN")]
    pub slack_bot_token: String,
    /// Secret used to verify request signatures.
    ///
    /// Environment variable: `SLACK_SIGNING_SECRET`
    #[serde(default, alias = "SLACK_SIGNING_SECRET")]
    pub slack_signing_secret: String,
    /// Web API base URL.
    ///
    /// Environment variable: `SLACK_API_BASE_URL`
    #[serde(default = "default_api_base_url", alias = "SLACK_API_BASE_URL")]
    pub slack_api_base_url: String,
    /// Timeout for each Web API call in seconds.
    ///
    /// Environment variable: `SLACK_TIMEOUT_SECONDS`
    #[serde(default = "default_slack_timeout", alias = "SLACK_TIMEOUT_SECONDS")]
    pub slack_timeout_seconds: u64,

    /// URL-safe base64 (unpadded) 32-byte key for the identity vault. When
    /// unset a fresh key is generated at startup and sealed ids do not
    /// survive a restart.
    ///
    /// Environment variable: `IDENTITY_VAULT_KEY`
    #[serde(default, alias = "IDENTITY_VAULT_KEY")]
    pub identity_vault_key: Option<String>,

    // Channels
    /// The only channel allowed to invoke the endpoints.
    ///
    /// Environment variable: `ALLOWED_CHANNEL_ID`
    #[serde(default = "default_allowed_channel_id", alias = "ALLOWED_CHANNEL_ID")]
    pub allowed_channel_id: String,
    /// Channel submissions are posted to and tallied from.
    ///
    /// Environment variable: `TARGET_CHANNEL`
    #[serde(default = "default_target_channel", alias = "TARGET_CHANNEL")]
    pub target_channel: String,

    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
    /// HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    // Logging
    /// Log level configuration.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
}

impl Config {
    /// Load configuration from defaults, config file, and environment variable
    /// overrides.
    ///
    /// # Errors
    ///
    /// Fails if a source cannot be parsed or the merged values do not pass
    /// validation.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Convert to the Slack client configuration.
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig::new(self.slack_bot_token.clone())
            .with_base_url(self.slack_api_base_url.clone())
            .with_timeout(Duration::from_secs(self.slack_timeout_seconds))
    }

    /// Convert to the channel policy used by the handlers.
    pub fn channel_policy(&self) -> ChannelPolicy {
        ChannelPolicy {
            allowed_channel_id: ChannelId::new(self.allowed_channel_id.clone()),
            target_channel: self.target_channel.clone(),
        }
    }

    /// Builds the identity vault: from the configured key if there is one,
    /// otherwise with a fresh key.
    ///
    /// # Errors
    ///
    /// Fails if the configured key is not a valid 32-byte key.
    pub fn identity_vault(&self) -> Result<IdentityVault> {
        match &self.identity_vault_key {
            Some(key) => IdentityVault::from_encoded_key(key).context("Invalid identity vault key"),
            None => Ok(IdentityVault::generate()),
        }
    }

    /// Whole-request timeout enforced by the server.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Parse server socket address from host and port configuration.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Get the bot token with everything past its type prefix masked for
    /// logging.
    pub fn masked_token(&self) -> String {
        match self.slack_bot_token.split_once('-') {
            Some((kind, _)) if !kind.is_empty() => format!("{kind}-***"),
            _ => "***".to_string(),
        }
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.slack_bot_token.trim().is_empty() {
            anyhow::bail!("slack_bot_token must be set (SLACK_BOT_TOKEN)");
        }

        if self.slack_signing_secret.trim().is_empty() {
            anyhow::bail!("slack_signing_secret must be set (SLACK_SIGNING_SECRET)");
        }

        if let Some(key) = &self.identity_vault_key {
            IdentityVault::from_encoded_key(key)
                .context("identity_vault_key must encode exactly 32 bytes (IDENTITY_VAULT_KEY)")?;
        }

        if self.slack_timeout_seconds == 0 {
            anyhow::bail!("slack_timeout_seconds must be greater than 0");
        }

        if self.allowed_channel_id.trim().is_empty() {
            anyhow::bail!("allowed_channel_id must not be empty");
        }

        if self.target_channel.trim().is_empty() {
            anyhow::bail!("target_channel must not be empty");
        }

        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        // Slack calls must time out before the whole request does.
        if self.slack_timeout_seconds >= self.request_timeout {
            anyhow::bail!(
                "slack_timeout_seconds ({}) must be less than request_timeout ({})",
                self.slack_timeout_seconds,
                self.request_timeout
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slack_bot_token: String::new(),
            slack_signing_secret: String::new(),
            slack_api_base_url: default_api_base_url(),
            slack_timeout_seconds: default_slack_timeout(),
            identity_vault_key: None,
            allowed_channel_id: default_allowed_channel_id(),
            target_channel: default_target_channel(),
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            rust_log: default_log_level(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("slack_bot_token", &self.masked_token())
            .field("slack_signing_secret", &"***")
            .field("slack_api_base_url", &self.slack_api_base_url)
            .field("slack_timeout_seconds", &self.slack_timeout_seconds)
            .field("identity_vault_key", &self.identity_vault_key.as_ref().map(|_| "***"))
            .field("allowed_channel_id", &self.allowed_channel_id)
            .field("target_channel", &self.target_channel)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("request_timeout", &self.request_timeout)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

fn default_api_base_url() -> String {
    youbou_slack::DEFAULT_API_BASE_URL.to_string()
}

fn default_slack_timeout() -> u64 {
    youbou_slack::DEFAULT_TIMEOUT_SECONDS
}

fn default_allowed_channel_id() -> String {
    "C1234567890".to_string()
}

fn default_target_channel() -> String {
    "#合宿要望".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
