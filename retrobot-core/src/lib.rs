//! # retrobot-core
//!
//! Core types and traits for the bot: [`ChatClient`], [`CommandHandler`], [`MessageLog`],
//! message and author types, error enums, and tracing initialization.
//! Platform-agnostic; used by retrobot-router, retrobot-clients, and the retrobot binary.

pub mod chat;
pub mod error;
pub mod logger;
pub mod msglog;
pub mod types;

pub use chat::ChatClient;
pub use error::{ChatError, HandlerError, ServiceError};
pub use logger::init_tracing;
pub use msglog::{CsvMessageLog, MessageLog};
pub use types::{
    Author, CommandContext, CommandHandler, Embed, EmbedField, IncomingMessage, Outgoing,
};
