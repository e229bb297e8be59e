//! Gemini chat commands.

use std::sync::Arc;

use async_trait::async_trait;
use retrobot_clients::GeminiClient;
use retrobot_core::{ChatClient, CommandContext, CommandHandler, Embed, HandlerError, Outgoing};

use super::{BLUE, GREEN};

/// Asks Gemini a question and replies with the answer as an embed.
pub struct AskHandler {
    chat: Arc<dyn ChatClient>,
    gemini: GeminiClient,
}

impl AskHandler {
    pub fn new(chat: Arc<dyn ChatClient>, gemini: GeminiClient) -> Self {
        Self { chat, gemini }
    }
}

#[async_trait]
impl CommandHandler for AskHandler {
    async fn run(&self, ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
        let question = ctx.args.trim();
        let answer = self.gemini.ask(question).await?;

        let embed = Embed::new("💭 Gemini AI Response", BLUE)
            .description(answer)
            .footer(format!("Model: {}", self.gemini.model()));
        let id = self.chat.send(ctx.channel_id, Outgoing::Embed(embed)).await?;
        Ok(Some(id))
    }
}

/// Shows the current Gemini generation configuration.
pub struct GeminiInfoHandler {
    chat: Arc<dyn ChatClient>,
    gemini: GeminiClient,
}

impl GeminiInfoHandler {
    pub fn new(chat: Arc<dyn ChatClient>, gemini: GeminiClient) -> Self {
        Self { chat, gemini }
    }
}

#[async_trait]
impl CommandHandler for GeminiInfoHandler {
    async fn run(&self, ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
        let config = self.gemini.config();
        let embed = Embed::new("Gemini AI Configuration", GREEN)
            .field("Model", self.gemini.model().to_string(), false)
            .field("Temperature", config.temperature.to_string(), true)
            .field("Top P", config.top_p.to_string(), true)
            .field("Top K", config.top_k.to_string(), true)
            .field("Max Tokens", config.max_output_tokens.to_string(), true);
        let id = self.chat.send(ctx.channel_id, Outgoing::Embed(embed)).await?;
        Ok(Some(id))
    }
}
