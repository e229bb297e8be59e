//! Stability image generation command.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use retrobot_clients::StabilityClient;
use retrobot_core::{ChatClient, CommandContext, CommandHandler, HandlerError, Outgoing};

/// Generates an image with the Stability API, saves it under the images
/// directory, and sends it as an attachment.
pub struct GenerateImageHandler {
    chat: Arc<dyn ChatClient>,
    stability: StabilityClient,
    images_dir: PathBuf,
}

impl GenerateImageHandler {
    pub fn new(chat: Arc<dyn ChatClient>, stability: StabilityClient, images_dir: PathBuf) -> Self {
        Self {
            chat,
            stability,
            images_dir,
        }
    }
}

#[async_trait]
impl CommandHandler for GenerateImageHandler {
    async fn run(&self, ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
        let prompt = ctx.args.trim();
        self.chat
            .send(
                ctx.channel_id,
                Outgoing::Text(format!("Generating image for prompt: {prompt}...")),
            )
            .await?;

        let png = self.stability.generate(prompt).await?;

        // Uniquely named per invocation, so concurrent generations never clash.
        let path = self
            .images_dir
            .join(format!("generated_{}.png", ctx.message_id));
        tokio::fs::write(&path, &png).await?;

        let id = self.chat.send(ctx.channel_id, Outgoing::File(path)).await?;
        Ok(Some(id))
    }
}
