//! Messaging platform collaborator trait.

use async_trait::async_trait;

use crate::error::ChatError;
use crate::types::Outgoing;

/// Narrow interface over the chat platform. The router and all command
/// handlers go through this trait; the concrete adapter lives in the binary.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends a message to the channel and returns the new message id.
    async fn send(&self, channel_id: u64, message: Outgoing) -> Result<u64, ChatError>;

    /// Edits an already-sent message. Attachments cannot be edited in.
    async fn edit(
        &self,
        channel_id: u64,
        message_id: u64,
        message: Outgoing,
    ) -> Result<(), ChatError>;

    /// Deletes a message. Fails with `NotFound` or `Forbidden` when the
    /// message is already gone or not deletable by the bot.
    async fn delete(&self, channel_id: u64, message_id: u64) -> Result<(), ChatError>;

    /// Adds a unicode emoji reaction to a message.
    async fn react(&self, channel_id: u64, message_id: u64, emoji: &str) -> Result<(), ChatError>;
}
