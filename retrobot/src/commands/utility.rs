//! Utility commands: latency check and bot stats.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use retrobot_core::{ChatClient, CommandContext, CommandHandler, Embed, HandlerError, Outgoing};

use super::{RegistrySlot, GOLD, GREEN};

/// Sends "Pinging..." and edits it into a latency embed.
pub struct PingHandler {
    chat: Arc<dyn ChatClient>,
}

impl PingHandler {
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl CommandHandler for PingHandler {
    async fn run(&self, ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
        let started = Instant::now();
        let id = self
            .chat
            .send(ctx.channel_id, Outgoing::Text("Pinging...".to_string()))
            .await?;
        let elapsed_ms = started.elapsed().as_millis();

        let embed = Embed::new("Pong! 🏓", GREEN).field(
            "Response Time",
            format!("{elapsed_ms}ms"),
            true,
        );
        self.chat
            .edit(ctx.channel_id, id, Outgoing::Embed(embed))
            .await?;
        Ok(Some(id))
    }
}

/// Bot stats: registered command count and uptime since start.
pub struct InfoHandler {
    chat: Arc<dyn ChatClient>,
    registry: RegistrySlot,
    started_at: DateTime<Utc>,
}

impl InfoHandler {
    pub fn new(chat: Arc<dyn ChatClient>, registry: RegistrySlot, started_at: DateTime<Utc>) -> Self {
        Self {
            chat,
            registry,
            started_at,
        }
    }
}

#[async_trait]
impl CommandHandler for InfoHandler {
    async fn run(&self, ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
        let registry = self
            .registry
            .get()
            .ok_or_else(|| HandlerError::Other("command registry not initialized".to_string()))?;

        let uptime = Utc::now() - self.started_at;
        let days = uptime.num_days();
        let hours = uptime.num_hours() % 24;
        let minutes = uptime.num_minutes() % 60;

        let embed = Embed::new("Bot Information", GOLD)
            .field("Commands", registry.len().to_string(), true)
            .field("Uptime", format!("{days}d {hours}h {minutes}m"), true);
        let id = self.chat.send(ctx.channel_id, Outgoing::Embed(embed)).await?;
        Ok(Some(id))
    }
}
