//! Slack Web API client.
//!
//! The relay talks to the chat platform only through the [`ChatPlatform`]
//! trait: post a message, read channel history. [`SlackClient`] implements it
//! against `chat.postMessage` and `conversations.history` with an explicit
//! request timeout; a timeout is reported like any other upstream failure.
//!
//! # Example
//!
//! ```no_run
//! use youbou_slack::{ChatPlatform, ClientConfig, SlackClient};
//!
//! # async fn example() -> youbou_slack::Result<()> {
//! let client = SlackClient::new(ClientConfig::new("xoxb-token"))?;
//! let posted = client.post_message("#general", "hello").await?;
//! println!("posted at {}", posted.ts);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod models;

pub use client::{ChatPlatform, ClientConfig, SlackClient};
pub use error::{Result, SlackError};
pub use models::{HistoryMessage, PostedMessage, Reaction};

/// Default Slack Web API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";

/// Default timeout for Slack API calls in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
