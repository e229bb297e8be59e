//! Bot configuration: tokens, prefix, and file paths, loaded from the environment.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Everything the process needs at startup. Loaded once; missing required
/// credentials abort startup with a nonzero exit.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// DISCORD_TOKEN
    pub discord_token: String,
    /// BOT_PREFIX, default `!`
    pub prefix: String,
    /// GEMINI_API_KEY
    pub gemini_api_key: String,
    /// STABILITY_API_KEY
    pub stability_api_key: String,
    /// RETRO_API_KEY; optional. The retro commands degrade to a
    /// configuration notice when absent.
    pub retro_api_key: Option<String>,
    /// GENERATED_IMAGES_DIR, default `generated_images`
    pub images_dir: PathBuf,
    /// LOG_DIR, default `logs`
    pub log_dir: PathBuf,
    /// LOG_FILE, default `retrobot.log` (inside LOG_DIR)
    pub log_file: String,
    /// MESSAGE_LOG, default `message_log.csv`
    pub message_log: PathBuf,
}

impl BotConfig {
    /// Loads from environment variables. `token` overrides DISCORD_TOKEN
    /// when provided (the `--token` CLI flag).
    pub fn load(token: Option<String>) -> Result<Self> {
        let discord_token = match token {
            Some(token) => token,
            None => env::var("DISCORD_TOKEN").context("DISCORD_TOKEN not set")?,
        };
        let gemini_api_key = env::var("GEMINI_API_KEY").context("GEMINI_API_KEY not set")?;
        let stability_api_key =
            env::var("STABILITY_API_KEY").context("STABILITY_API_KEY not set")?;
        let retro_api_key = env::var("RETRO_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let prefix = env::var("BOT_PREFIX").unwrap_or_else(|_| "!".to_string());
        let images_dir = env::var("GENERATED_IMAGES_DIR")
            .unwrap_or_else(|_| "generated_images".to_string())
            .into();
        let log_dir: PathBuf = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()).into();
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "retrobot.log".to_string());
        let message_log = env::var("MESSAGE_LOG")
            .unwrap_or_else(|_| "message_log.csv".to_string())
            .into();

        let config = Self {
            discord_token,
            prefix,
            gemini_api_key,
            stability_api_key,
            retro_api_key,
            images_dir,
            log_dir,
            log_file,
            message_log,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.prefix.trim().is_empty() {
            bail!("BOT_PREFIX must not be empty or whitespace");
        }
        Ok(())
    }

    pub fn log_file_path(&self) -> PathBuf {
        self.log_dir.join(&self.log_file)
    }

    /// Creates the images and log directories if they don't exist yet.
    /// Must run before tracing opens the log file.
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.images_dir)
            .with_context(|| format!("creating {}", self.images_dir.display()))?;
        fs::create_dir_all(&self.log_dir)
            .with_context(|| format!("creating {}", self.log_dir.display()))?;
        Ok(())
    }
}
