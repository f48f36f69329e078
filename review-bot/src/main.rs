//! Review Bot
//!
//! A single-account watcher that polls the homework status API and
//! announces review verdicts in a Telegram chat.
//!
//! Architecture:
//! - Configuration: credentials and tuning from the environment (or `.env`)
//! - Repositories: the status API and the Bot API behind small traits
//! - Services: notification delivery with daily error dedupe
//! - Scheduler: the fixed-interval poll-detect-notify loop
//!
//! The watcher runs until it is terminated or the status API rejects its
//! credential. Nothing is persisted between runs.

mod clock;
mod config;
mod repository;
mod scheduler;
mod service;

#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use review_client::{PracticumClient, TelegramClient};
use review_core::{PollCursor, SentErrorSet, StatusInterpreter};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::clock::SystemClock;
use crate::config::Config;
use crate::scheduler::StatusPoller;
use crate::service::Notifier;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "review_bot=debug,review_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Review Bot");

    // Load configuration
    let config = load_config()?;
    info!(
        "Loaded configuration: endpoint={}, chat_id={}",
        config.endpoint, config.telegram_chat_id
    );

    // Initialize clients
    let bot = TelegramClient::with_api_url(
        config.telegram_api_url.clone(),
        config.telegram_token.clone(),
        config.telegram_chat_id.clone(),
    );
    check_bot(&bot).await?;

    let api = PracticumClient::new(config.endpoint.clone(), config.practicum_token.clone());

    info!("Clients initialized");

    let mut poller = StatusPoller::new(
        Arc::new(api),
        Notifier::new(Arc::new(bot)),
        Arc::new(SystemClock),
        StatusInterpreter::new(config.templates.clone()),
        PollCursor::new(config.from_date),
        SentErrorSet::new(config.error_dedupe_capacity),
        config.retry_period,
    );

    // Start polling loop
    tokio::select! {
        result = poller.run() => {
            if let Err(e) = result {
                error!("fatal: {}", e);
                return Err(e).context("Status poller stopped");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Forced shutdown, the current cycle is abandoned");
        }
    }

    Ok(())
}

/// Loads and validates configuration; any failure is fatal
fn load_config() -> Result<Config> {
    let config = Config::from_env()
        .and_then(|config| config.validate().map(|()| config))
        .inspect_err(|e| error!("fatal: {}", e))?;
    Ok(config)
}

/// Verifies the bot token before polling starts
///
/// A rejected token is fatal. Any other failure is only logged: the Bot API
/// may be briefly unreachable and sends are retried every cycle anyway.
async fn check_bot(bot: &TelegramClient) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => {
            info!(
                "Bot authorized as {}",
                me.username.as_deref().unwrap_or(&me.first_name)
            );
            Ok(())
        }
        Err(e) if e.is_unauthorized() => {
            error!("fatal: {}", e);
            Err(e).context("Telegram rejected the bot token")
        }
        Err(e) => {
            warn!("Could not verify the bot token: {}", e);
            Ok(())
        }
    }
}
