//! Fun and entertainment commands.

use std::sync::Arc;

use async_trait::async_trait;
use retrobot_core::{ChatClient, CommandContext, CommandHandler, Embed, HandlerError, Outgoing};

use super::GOLD;

/// Sends a friendly greeting mentioning the author.
pub struct HelloHandler {
    chat: Arc<dyn ChatClient>,
}

impl HelloHandler {
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl CommandHandler for HelloHandler {
    async fn run(&self, ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
        let greeting = format!(
            "Hello <@{}>! How can I assist you today?",
            ctx.author.id
        );
        let id = self.chat.send(ctx.channel_id, Outgoing::Text(greeting)).await?;
        Ok(Some(id))
    }
}

/// Flips a coin.
pub struct FlipHandler {
    chat: Arc<dyn ChatClient>,
}

impl FlipHandler {
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl CommandHandler for FlipHandler {
    async fn run(&self, ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
        let result = if rand::random() { "Heads" } else { "Tails" };
        let embed = Embed::new("🪙 Coin Flip", GOLD)
            .description(format!("The coin landed on: **{result}**"));
        let id = self.chat.send(ctx.channel_id, Outgoing::Embed(embed)).await?;
        Ok(Some(id))
    }
}
