//! Help command: grouped command listing and per-command details.

use std::sync::Arc;

use async_trait::async_trait;
use retrobot_core::{ChatClient, CommandContext, CommandHandler, Embed, HandlerError, Outgoing};

use super::{RegistrySlot, BLUE, GREEN};

pub struct HelpHandler {
    chat: Arc<dyn ChatClient>,
    registry: RegistrySlot,
    prefix: String,
}

impl HelpHandler {
    pub fn new(chat: Arc<dyn ChatClient>, registry: RegistrySlot, prefix: String) -> Self {
        Self {
            chat,
            registry,
            prefix,
        }
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn run(&self, ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
        let registry = self
            .registry
            .get()
            .ok_or_else(|| HandlerError::Other("command registry not initialized".to_string()))?;

        let arg = ctx.args.trim();
        let outgoing = if arg.is_empty() {
            let mut embed = Embed::new("Bot Commands", BLUE)
                .description("Here's a list of available commands:");
            for (category, specs) in registry.by_category() {
                let lines: Vec<String> = specs
                    .iter()
                    .map(|spec| format!("{}{}", self.prefix, spec.usage))
                    .collect();
                embed = embed.field(category, lines.join("\n"), false);
            }
            Outgoing::Embed(embed)
        } else {
            match registry.resolve(arg) {
                Some(spec) => {
                    let mut embed = Embed::new(format!("Help for {}", spec.name), GREEN)
                        .description(spec.help)
                        .field("Usage", format!("{}{}", self.prefix, spec.usage), false);
                    if !spec.aliases.is_empty() {
                        embed = embed.field("Aliases", spec.aliases.join(", "), false);
                    }
                    Outgoing::Embed(embed)
                }
                None => Outgoing::Text(format!("No command called \"{arg}\" found.")),
            }
        };

        let id = self.chat.send(ctx.channel_id, outgoing).await?;
        Ok(Some(id))
    }
}
