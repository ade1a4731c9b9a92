//! HTTP surface of the anonymous request relay.
//!
//! Two Slack-facing routes plus a health probe:
//!
//! - `POST /post_request` verifies the Slack signature, seals the submitter's
//!   id and relays the sanitized text to the target channel
//! - `GET /vote_summary` returns the reaction tally of the target channel
//! - `GET /health` reports store health

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod crypto;
pub mod handlers;
pub mod server;
mod state;

pub use config::Config;
pub use server::{create_router, serve, start_server};
pub use state::{AppState, ChannelPolicy};
