//! Retro Diffusion commands: generation, model listing, and diagnostics.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use retrobot_clients::RetroClient;
use retrobot_core::{ChatClient, CommandContext, CommandHandler, Embed, HandlerError, Outgoing};
use tracing::warn;

use super::{BLUE, ORANGE, PURPLE};

/// Generates a retro-style image: status message while the API works, then
/// an embed with the generation metadata plus the image attachment.
pub struct RetroHandler {
    chat: Arc<dyn ChatClient>,
    retro: Option<RetroClient>,
    images_dir: PathBuf,
}

impl RetroHandler {
    pub fn new(chat: Arc<dyn ChatClient>, retro: Option<RetroClient>, images_dir: PathBuf) -> Self {
        Self {
            chat,
            retro,
            images_dir,
        }
    }
}

#[async_trait]
impl CommandHandler for RetroHandler {
    async fn run(&self, ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
        let Some(retro) = &self.retro else {
            let id = self
                .chat
                .send(
                    ctx.channel_id,
                    Outgoing::Text(
                        "⚠️ Retro Diffusion API key not configured. Set the RETRO_API_KEY \
                         environment variable."
                            .to_string(),
                    ),
                )
                .await?;
            return Ok(Some(id));
        };

        let prompt = ctx.args.trim();
        let status_id = self
            .chat
            .send(
                ctx.channel_id,
                Outgoing::Text(format!(
                    "🎨 Generating retro-style image for prompt: {prompt}..."
                )),
            )
            .await?;

        let image = match retro.generate(prompt).await {
            Ok(image) => image,
            Err(e) => {
                // Clean up the status message; the router reports the failure.
                let _ = self.chat.delete(ctx.channel_id, status_id).await;
                return Err(e.into());
            }
        };

        let path = self.images_dir.join(format!("retro_{}.png", ctx.message_id));
        tokio::fs::write(&path, &image.png).await?;

        let credit_cost = image
            .credit_cost
            .map(|c| c.to_string())
            .unwrap_or_else(|| "1".to_string());
        let remaining = image
            .remaining_credits
            .map(|c| c.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let embed = Embed::new("🎨 Retro Diffusion Image", PURPLE)
            .description(format!("**Prompt:** {prompt}"))
            .field("Model", image.model.clone(), true)
            .field("Credit Cost", credit_cost, true)
            .field("Remaining Credits", remaining, true);

        let _ = self.chat.delete(ctx.channel_id, status_id).await;
        let id = self
            .chat
            .send(ctx.channel_id, Outgoing::EmbedWithFile(embed, path.clone()))
            .await?;

        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %e, "failed to remove temporary image");
        }
        Ok(Some(id))
    }
}

/// Static listing of the available Retro Diffusion models.
pub struct RetroModelsHandler {
    chat: Arc<dyn ChatClient>,
}

impl RetroModelsHandler {
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl CommandHandler for RetroModelsHandler {
    async fn run(&self, ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
        let embed = Embed::new("🎨 Available Retro Diffusion Models", BLUE)
            .description("Here are the available models for image generation:")
            .field(
                "RD_FLUX",
                "Standard retro-style image generation model\n\
                 • Resolution: Up to 512x512\n\
                 • Best for: Retro-style artwork and illustrations",
                false,
            );
        let id = self.chat.send(ctx.channel_id, Outgoing::Embed(embed)).await?;
        Ok(Some(id))
    }
}

/// Configuration diagnostics with the API key redacted. Admin-gated at
/// registration time.
pub struct RetroDebugHandler {
    chat: Arc<dyn ChatClient>,
    retro: Option<RetroClient>,
}

impl RetroDebugHandler {
    pub fn new(chat: Arc<dyn ChatClient>, retro: Option<RetroClient>) -> Self {
        Self { chat, retro }
    }
}

#[async_trait]
impl CommandHandler for RetroDebugHandler {
    async fn run(&self, ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
        let embed = match &self.retro {
            Some(retro) => Embed::new("🔧 Retro Diffusion Debug Information", ORANGE)
                .field(
                    "API Key Status",
                    format!("✅ Set (Length: {} chars)", retro.key_len()),
                    true,
                )
                .field("API Key Preview", retro.masked_key(), true)
                .field("API URL", retro.api_url(), false),
            None => Embed::new("🔧 Retro Diffusion Debug Information", ORANGE)
                .field("API Key Status", "❌ Not Set", true)
                .field("API Key Preview", "Not set", true),
        };
        let id = self.chat.send(ctx.channel_id, Outgoing::Embed(embed)).await?;
        Ok(Some(id))
    }
}
