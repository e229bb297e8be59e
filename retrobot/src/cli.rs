//! Command-line interface for the retrobot binary.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "retrobot", about = "Edit-aware prefix-command Discord bot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the bot and begin consuming gateway events
    Run {
        /// Discord token override; falls back to the DISCORD_TOKEN env var
        #[arg(long)]
        token: Option<String>,
    },
}
