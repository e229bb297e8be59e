//! The bot's command set and its registration.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use retrobot_clients::{GeminiClient, RetroClient, StabilityClient};
use retrobot_core::ChatClient;
use retrobot_router::{CommandRegistry, CommandSpec, RegistryError};

pub mod fun;
pub mod gemini;
pub mod help;
pub mod image;
pub mod retro;
pub mod utility;

// Embed accent colors.
pub(crate) const BLUE: u32 = 0x3498db;
pub(crate) const GREEN: u32 = 0x2ecc71;
pub(crate) const GOLD: u32 = 0xf1c40f;
pub(crate) const PURPLE: u32 = 0x9b59b6;
pub(crate) const ORANGE: u32 = 0xe67e22;

/// Shared slot for the registry handle. The help and info commands need to
/// read the registry that contains them, so they hold this slot and the
/// runner fills it after registration completes.
pub type RegistrySlot = Arc<OnceLock<Arc<CommandRegistry>>>;

/// Everything the command set needs at construction time.
pub struct CommandDeps {
    pub chat: Arc<dyn ChatClient>,
    pub gemini: GeminiClient,
    pub stability: StabilityClient,
    pub retro: Option<RetroClient>,
    pub images_dir: PathBuf,
    pub prefix: String,
    pub registry_slot: RegistrySlot,
    pub started_at: DateTime<Utc>,
}

/// Registers the full command set. Descriptors are immutable after this.
pub fn build_registry(deps: &CommandDeps) -> Result<CommandRegistry, RegistryError> {
    let mut registry = CommandRegistry::new();

    registry.register(CommandSpec {
        name: "hello",
        aliases: &["hi"],
        help: "Responds with a friendly greeting",
        usage: "hello",
        category: "Fun",
        requires_args: false,
        permission: None,
        handler: Arc::new(fun::HelloHandler::new(deps.chat.clone())),
    })?;

    registry.register(CommandSpec {
        name: "flip",
        aliases: &[],
        help: "Flip a coin",
        usage: "flip",
        category: "Fun",
        requires_args: false,
        permission: None,
        handler: Arc::new(fun::FlipHandler::new(deps.chat.clone())),
    })?;

    registry.register(CommandSpec {
        name: "ping",
        aliases: &[],
        help: "Checks the bot's latency",
        usage: "ping",
        category: "Utility",
        requires_args: false,
        permission: None,
        handler: Arc::new(utility::PingHandler::new(deps.chat.clone())),
    })?;

    registry.register(CommandSpec {
        name: "info",
        aliases: &["about"],
        help: "Displays information about the bot",
        usage: "info",
        category: "Utility",
        requires_args: false,
        permission: None,
        handler: Arc::new(utility::InfoHandler::new(
            deps.chat.clone(),
            deps.registry_slot.clone(),
            deps.started_at,
        )),
    })?;

    registry.register(CommandSpec {
        name: "ask",
        aliases: &[],
        help: "Ask Gemini AI a question",
        usage: "ask <question>",
        category: "Gemini",
        requires_args: true,
        permission: None,
        handler: Arc::new(gemini::AskHandler::new(
            deps.chat.clone(),
            deps.gemini.clone(),
        )),
    })?;

    registry.register(CommandSpec {
        name: "gemini_info",
        aliases: &[],
        help: "Display information about the Gemini AI configuration",
        usage: "gemini_info",
        category: "Gemini",
        requires_args: false,
        permission: None,
        handler: Arc::new(gemini::GeminiInfoHandler::new(
            deps.chat.clone(),
            deps.gemini.clone(),
        )),
    })?;

    registry.register(CommandSpec {
        name: "generate_image",
        aliases: &["imagine"],
        help: "Generates an image using the Stable Diffusion API",
        usage: "generate_image <prompt>",
        category: "Images",
        requires_args: true,
        permission: None,
        handler: Arc::new(image::GenerateImageHandler::new(
            deps.chat.clone(),
            deps.stability.clone(),
            deps.images_dir.clone(),
        )),
    })?;

    registry.register(CommandSpec {
        name: "retro",
        aliases: &[],
        help: "Generates a retro-style image from a text prompt",
        usage: "retro <prompt>",
        category: "Retro",
        requires_args: true,
        permission: None,
        handler: Arc::new(retro::RetroHandler::new(
            deps.chat.clone(),
            deps.retro.clone(),
            deps.images_dir.clone(),
        )),
    })?;

    registry.register(CommandSpec {
        name: "retro_models",
        aliases: &[],
        help: "Lists available Retro Diffusion models",
        usage: "retro_models",
        category: "Retro",
        requires_args: false,
        permission: None,
        handler: Arc::new(retro::RetroModelsHandler::new(deps.chat.clone())),
    })?;

    registry.register(CommandSpec {
        name: "retro_debug",
        aliases: &[],
        help: "Debug Retro Diffusion configuration (admin only)",
        usage: "retro_debug",
        category: "Retro",
        requires_args: false,
        permission: Some(|ctx| ctx.author.is_admin),
        handler: Arc::new(retro::RetroDebugHandler::new(
            deps.chat.clone(),
            deps.retro.clone(),
        )),
    })?;

    registry.register(CommandSpec {
        name: "help",
        aliases: &[],
        help: "Shows this list, or details for one command",
        usage: "help [command]",
        category: "Help",
        requires_args: false,
        permission: None,
        handler: Arc::new(help::HelpHandler::new(
            deps.chat.clone(),
            deps.registry_slot.clone(),
            deps.prefix.clone(),
        )),
    })?;

    Ok(registry)
}
