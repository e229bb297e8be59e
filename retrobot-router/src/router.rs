//! Event router: drives parse → resolve → execute per inbound event and
//! tracks reply pairings across message edits.

use std::sync::Arc;

use rand::seq::SliceRandom;
use retrobot_core::{ChatClient, CommandContext, IncomingMessage, MessageLog, Outgoing};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::error::DispatchError;
use crate::executor;
use crate::registry::CommandRegistry;
use crate::tracker::{ResponseTracker, TrackedReply};

/// Emojis used to acknowledge a command invocation.
const REACTION_EMOJIS: [&str; 10] = ["⏳", "🔥", "✨", "🕑", "🤖", "💡", "🌟", "⚙️", "🌀", "🚀"];

/// Top-level event consumer. Reentrant per event: events are accepted in
/// platform delivery order, command execution runs in a spawned task per
/// event, and completion order is unspecified.
///
/// Cheap to clone; all clones share the same tracker and collaborators.
#[derive(Clone)]
pub struct EventRouter {
    prefix: String,
    registry: Arc<CommandRegistry>,
    tracker: ResponseTracker,
    chat: Arc<dyn ChatClient>,
    log: Arc<dyn MessageLog>,
}

impl EventRouter {
    pub fn new(
        prefix: impl Into<String>,
        registry: Arc<CommandRegistry>,
        chat: Arc<dyn ChatClient>,
        log: Arc<dyn MessageLog>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            registry,
            tracker: ResponseTracker::new(),
            chat,
            log,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn tracker(&self) -> &ResponseTracker {
        &self.tracker
    }

    /// Handles a freshly created platform message. Returns the handle of the
    /// spawned command task when the message was a command invocation, so
    /// callers that need completion (tests, shutdown draining) can await it.
    #[instrument(skip(self, msg), fields(message_id = msg.id))]
    pub async fn handle_created(&self, msg: IncomingMessage) -> Option<JoinHandle<()>> {
        if msg.author.is_bot {
            return None;
        }
        info!(author = %msg.author.name, content = %msg.content, "received message");
        if let Err(e) = self.log.log_message(msg.id, &msg.author.name, &msg.content) {
            warn!(error = %e, "message log append failed");
        }
        self.dispatch(msg)
    }

    /// Handles an edited message.
    ///
    /// `before_content` is the pre-edit body when the platform delivered it.
    /// Without it a content change cannot be established, so the event is
    /// ignored; platforms emit update events for embed unfurls and other
    /// non-edits, and retracting a reply on those would re-run the command
    /// for nothing. Unchanged content is ignored for the same reason. On a
    /// real change any stale reply is retracted, then the new content is
    /// re-dispatched exactly like a created message. Message identity is
    /// stable across edits, so keying the retraction and the new pairing by
    /// `after.id` keeps tracking continuous for later edits of the same
    /// message.
    #[instrument(skip(self, before_content, after), fields(message_id = after.id))]
    pub async fn handle_edited(
        &self,
        before_content: Option<&str>,
        after: IncomingMessage,
    ) -> Option<JoinHandle<()>> {
        if after.author.is_bot {
            return None;
        }
        let Some(before) = before_content else {
            debug!("pre-edit content unavailable, ignoring update");
            return None;
        };
        if before == after.content {
            debug!("content unchanged, ignoring edit");
            return None;
        }
        if self.tracker.retract(after.id, self.chat.as_ref()).await {
            info!("retracted stale reply for edited message");
        }
        info!(content = %after.content, "re-dispatching edited message");
        self.dispatch(after)
    }

    /// Parses and resolves the message, then runs the command in its own
    /// task. Fire-and-continue: the router keeps accepting events while the
    /// command's handler is suspended on external I/O.
    fn dispatch(&self, msg: IncomingMessage) -> Option<JoinHandle<()>> {
        let invocation = crate::parser::parse(&self.prefix, &msg.content)?;
        let ctx = CommandContext::from_message(&msg, invocation.args);
        let resolved = self.registry.resolve(invocation.name);
        let token = invocation.name.to_string();
        let router = self.clone();

        Some(tokio::spawn(async move {
            router.acknowledge(&ctx).await;
            match resolved {
                None => {
                    router
                        .report_error(&ctx, DispatchError::CommandNotFound(token))
                        .await;
                }
                Some(spec) => match executor::execute(&spec, &ctx).await {
                    Ok(Some(reply_id)) => {
                        router
                            .tracker
                            .record(
                                ctx.message_id,
                                TrackedReply {
                                    channel_id: ctx.channel_id,
                                    message_id: reply_id,
                                },
                            )
                            .await;
                    }
                    Ok(None) => {}
                    Err(err) => router.report_error(&ctx, err).await,
                },
            }
        }))
    }

    /// Reacts to the originating message with a random emoji. Exactly one
    /// reaction per invocation, success or failure.
    async fn acknowledge(&self, ctx: &CommandContext) {
        let emoji = REACTION_EMOJIS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("🤖");
        if let Err(e) = self.chat.react(ctx.channel_id, ctx.message_id, emoji).await {
            debug!(error = %e, "acknowledgment reaction failed");
        }
    }

    /// Single error-reporting path: exactly one user-visible notice per
    /// failure. Only genuine handler failures are logged as errors; unknown
    /// commands, missing arguments, and denied permissions are user mistakes.
    async fn report_error(&self, ctx: &CommandContext, err: DispatchError) {
        let notice = match &err {
            DispatchError::CommandNotFound(_) => format!(
                "Sorry, I don't recognize that command. Type {}help to see available commands.",
                self.prefix
            ),
            DispatchError::MissingArgument(name) => format!(
                "Oops! You're missing some required arguments. Type {}help {} for more info.",
                self.prefix, name
            ),
            DispatchError::PermissionDenied(_) => {
                "You don't have permission to use that command.".to_string()
            }
            DispatchError::HandlerFailure { source, .. } => {
                error!(error = %err, "command handler failed");
                format!("An error occurred: {source}")
            }
        };
        if let Err(e) = self.chat.send(ctx.channel_id, Outgoing::Text(notice)).await {
            warn!(error = %e, "failed to deliver error notice");
        }
    }
}
