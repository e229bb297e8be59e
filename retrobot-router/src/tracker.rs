//! Response tracker: source message id → bot reply pairing, retractable on edits.

use std::collections::HashMap;
use std::sync::Arc;

use retrobot_core::{ChatClient, ChatError};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Channel and id of a tracked bot reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedReply {
    pub channel_id: u64,
    pub message_id: u64,
}

/// In-memory map from a source message id to the bot reply it produced.
///
/// Each source maps to at most one reply; recording again overwrites. The map
/// starts empty on every launch and is never persisted; losing pairings on
/// restart is accepted. Mutations are atomic with respect to concurrent
/// lookups (shared behind an async RwLock).
#[derive(Clone, Default)]
pub struct ResponseTracker {
    pairings: Arc<RwLock<HashMap<u64, TrackedReply>>>,
}

impl ResponseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the pairing for `source_id`.
    pub async fn record(&self, source_id: u64, reply: TrackedReply) {
        self.pairings.write().await.insert(source_id, reply);
    }

    pub async fn get(&self, source_id: u64) -> Option<TrackedReply> {
        self.pairings.read().await.get(&source_id).copied()
    }

    /// Removes the pairing without touching the platform.
    pub async fn forget(&self, source_id: u64) -> Option<TrackedReply> {
        self.pairings.write().await.remove(&source_id)
    }

    /// Removes the pairing and best-effort deletes the tracked reply.
    ///
    /// `NotFound` and `Forbidden` are swallowed: the reply is already gone
    /// or not ours to delete, and retraction is cleanup, not a guarantee.
    /// Returns whether a pairing existed.
    pub async fn retract(&self, source_id: u64, chat: &dyn ChatClient) -> bool {
        let Some(reply) = self.forget(source_id).await else {
            return false;
        };
        match chat.delete(reply.channel_id, reply.message_id).await {
            Ok(()) => {}
            Err(ChatError::NotFound | ChatError::Forbidden) => {
                debug!(
                    source_id,
                    reply_id = reply.message_id,
                    "stale reply already gone or not deletable"
                );
            }
            Err(e) => {
                warn!(source_id, reply_id = reply.message_id, error = %e, "retraction failed");
            }
        }
        true
    }

    pub async fn len(&self) -> usize {
        self.pairings.read().await.len()
    }
}
