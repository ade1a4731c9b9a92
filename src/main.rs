//! Youbou anonymous request relay.
//!
//! Main entry point. Loads configuration, builds the Slack client, identity
//! vault and submission store, then serves until SIGINT or SIGTERM.

use anyhow::{Context, Result};
use tracing::info;
use youbou_api::{AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    init_tracing(&config.rust_log)?;

    info!("Starting Youbou request relay");
    info!(
        bot_token = %config.masked_token(),
        api_base_url = %config.slack_api_base_url,
        allowed_channel = %config.allowed_channel_id,
        target_channel = %config.target_channel,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config)?;
    if config.identity_vault_key.is_none() {
        info!("No IDENTITY_VAULT_KEY set; submitter ids sealed by earlier runs cannot be opened");
    }

    let addr = config.parse_server_addr()?;
    youbou_api::start_server(state, addr, config.request_timeout())
        .await
        .context("HTTP server failed")?;

    info!("Youbou shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{level},youbou=debug,tower_http=debug")))
        .context("Invalid RUST_LOG filter")?;

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
