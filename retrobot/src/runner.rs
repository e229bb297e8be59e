//! Process wiring: builds the clients, registry, and router, then runs the
//! Discord gateway until it disconnects.

use std::sync::{Arc, OnceLock};

use anyhow::{Context as _, Result};
use chrono::Utc;
use retrobot_clients::{GeminiClient, RetroClient, StabilityClient};
use retrobot_core::{init_tracing, CsvMessageLog};
use retrobot_router::EventRouter;
use serenity::http::Http;
use serenity::prelude::GatewayIntents;
use serenity::Client;
use tracing::info;

use crate::commands::{build_registry, CommandDeps};
use crate::config::BotConfig;
use crate::discord::{RouterEventHandler, SerenityChat};

pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.ensure_directories()?;
    init_tracing(config.log_file_path())?;
    info!(prefix = %config.prefix, "starting retrobot");

    // Standalone HTTP client for outbound sends; the gateway client below
    // owns its own.
    let http = Arc::new(Http::new(&config.discord_token));
    let chat = Arc::new(SerenityChat::new(http));

    let registry_slot = Arc::new(OnceLock::new());
    let deps = CommandDeps {
        chat: chat.clone(),
        gemini: GeminiClient::new(config.gemini_api_key.clone()),
        stability: StabilityClient::new(config.stability_api_key.clone()),
        retro: config.retro_api_key.clone().map(RetroClient::new),
        images_dir: config.images_dir.clone(),
        prefix: config.prefix.clone(),
        registry_slot: registry_slot.clone(),
        started_at: Utc::now(),
    };
    let registry = Arc::new(build_registry(&deps)?);
    registry_slot
        .set(registry.clone())
        .ok()
        .context("registry slot filled twice")?;
    info!(commands = registry.len(), "command registry built");

    let router = Arc::new(EventRouter::new(
        config.prefix.clone(),
        registry,
        chat,
        Arc::new(CsvMessageLog::new(config.message_log.clone())),
    ));

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(RouterEventHandler::new(router))
        .await
        .context("building Discord client")?;

    client.start().await.context("Discord gateway stopped")?;
    Ok(())
}
