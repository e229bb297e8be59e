//! Core types: author, incoming message, command context, outgoing content, and the Handler trait.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HandlerError;

/// Message author identity as seen by the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    pub name: String,
    /// True for the bot itself and any other bot account; such messages are never dispatched.
    pub is_bot: bool,
    /// Whether the author holds administrator rights in the originating guild.
    /// False outside guilds; checked by permission predicates.
    pub is_admin: bool,
}

/// A single inbound platform message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: u64,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub author: Author,
    pub content: String,
}

/// Per-invocation context handed to a command handler.
/// Created fresh for every dispatch, owned by the executing handler, discarded after it returns.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub message_id: u64,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub author: Author,
    /// Raw argument string after the command token; not re-split. Handlers decide further parsing.
    pub args: String,
}

impl CommandContext {
    /// Builds a context from an inbound message and its parsed argument remainder.
    pub fn from_message(msg: &IncomingMessage, args: &str) -> Self {
        Self {
            message_id: msg.id,
            channel_id: msg.channel_id,
            guild_id: msg.guild_id,
            author: msg.author.clone(),
            args: args.to_string(),
        }
    }
}

/// One name/value field of an [`Embed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Platform-agnostic embed payload; the adapter maps it to the native rich-message type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
}

impl Embed {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            color,
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

/// Outbound message content.
#[derive(Debug, Clone)]
pub enum Outgoing {
    Text(String),
    Embed(Embed),
    /// Embed plus a local file attachment (e.g. a generated image).
    EmbedWithFile(Embed, PathBuf),
    /// Bare file attachment.
    File(PathBuf),
}

/// The unit of logic executed for a resolved command.
///
/// Handlers hold their collaborators (chat client, service clients, paths) at
/// construction time; `run` receives only the per-invocation context.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Runs the command. Returns the id of the visible reply, if one was sent,
    /// so the router can track it for edit-triggered retraction.
    async fn run(&self, ctx: &CommandContext) -> Result<Option<u64>, HandlerError>;
}
