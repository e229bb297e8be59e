//! # retrobot
//!
//! Discord wiring for the dispatch core: environment configuration, the
//! command set (fun / utility / gemini / images / retro / help), the serenity
//! adapter implementing [`retrobot_core::ChatClient`], and the runner that
//! connects the gateway and feeds events into the router.

pub mod cli;
pub mod commands;
pub mod config;
pub mod discord;
pub mod runner;

pub use cli::{Cli, Commands};
pub use commands::{build_registry, CommandDeps};
pub use config::BotConfig;
pub use discord::{RouterEventHandler, SerenityChat};
pub use runner::run_bot;
