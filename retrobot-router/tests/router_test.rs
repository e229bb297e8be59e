//! Scenario tests for the event router: dispatch, edit lifecycle, error
//! notices, and concurrent execution, all against a recording mock chat client.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use retrobot_core::{
    Author, ChatClient, ChatError, CommandContext, CommandHandler, HandlerError, IncomingMessage,
    MessageLog, Outgoing,
};
use retrobot_router::{CommandRegistry, CommandSpec, EventRouter, TrackedReply};
use tokio::sync::mpsc;

/// One recorded `send` call.
#[derive(Debug, Clone)]
struct SendRecord {
    channel_id: u64,
    message_id: u64,
    text: String,
}

/// Mock chat client that records sends, deletes, and reactions. Message ids
/// are handed out from an atomic counter starting at 1000.
struct MockChat {
    next_id: AtomicU64,
    send_tx: mpsc::UnboundedSender<SendRecord>,
    delete_tx: mpsc::UnboundedSender<u64>,
    reactions: AtomicUsize,
}

impl MockChat {
    fn with_receivers() -> (
        Arc<Self>,
        mpsc::UnboundedReceiver<SendRecord>,
        mpsc::UnboundedReceiver<u64>,
    ) {
        let (send_tx, send_rx) = mpsc::unbounded_channel();
        let (delete_tx, delete_rx) = mpsc::unbounded_channel();
        let chat = Arc::new(Self {
            next_id: AtomicU64::new(1000),
            send_tx,
            delete_tx,
            reactions: AtomicUsize::new(0),
        });
        (chat, send_rx, delete_rx)
    }
}

#[async_trait]
impl ChatClient for MockChat {
    async fn send(&self, channel_id: u64, message: Outgoing) -> Result<u64, ChatError> {
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let text = match message {
            Outgoing::Text(text) => text,
            Outgoing::Embed(embed) => embed.title,
            Outgoing::EmbedWithFile(embed, _) => embed.title,
            Outgoing::File(path) => path.display().to_string(),
        };
        let _ = self.send_tx.send(SendRecord {
            channel_id,
            message_id,
            text,
        });
        Ok(message_id)
    }

    async fn edit(
        &self,
        _channel_id: u64,
        _message_id: u64,
        _message: Outgoing,
    ) -> Result<(), ChatError> {
        Ok(())
    }

    async fn delete(&self, _channel_id: u64, message_id: u64) -> Result<(), ChatError> {
        let _ = self.delete_tx.send(message_id);
        Ok(())
    }

    async fn react(&self, _channel_id: u64, _message_id: u64, _emoji: &str) -> Result<(), ChatError> {
        self.reactions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// MessageLog that drops everything.
struct NullLog;

impl MessageLog for NullLog {
    fn log_message(&self, _message_id: u64, _author: &str, _content: &str) -> std::io::Result<()> {
        Ok(())
    }
}

/// Replies with a fixed text and reports the reply id, counting invocations.
struct EchoHandler {
    chat: Arc<dyn ChatClient>,
    reply: &'static str,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl EchoHandler {
    fn new(chat: Arc<dyn ChatClient>, reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            chat,
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn slow(chat: Arc<dyn ChatClient>, reply: &'static str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            chat,
            reply,
            delay: Some(delay),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CommandHandler for EchoHandler {
    async fn run(&self, ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let id = self
            .chat
            .send(ctx.channel_id, Outgoing::Text(self.reply.to_string()))
            .await?;
        Ok(Some(id))
    }
}

/// Always fails without sending anything.
struct FailingHandler;

#[async_trait]
impl CommandHandler for FailingHandler {
    async fn run(&self, _ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
        Err(HandlerError::Other("kaboom".to_string()))
    }
}

/// Counts invocations, never replies.
struct CountingHandler {
    calls: AtomicUsize,
}

#[async_trait]
impl CommandHandler for CountingHandler {
    async fn run(&self, _ctx: &CommandContext) -> Result<Option<u64>, HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

fn spec(name: &'static str, handler: Arc<dyn CommandHandler>) -> CommandSpec {
    CommandSpec {
        name,
        aliases: &[],
        help: "",
        usage: name,
        category: "Test",
        requires_args: false,
        permission: None,
        handler,
    }
}

fn message(id: u64, author_id: u64, content: &str) -> IncomingMessage {
    IncomingMessage {
        id,
        channel_id: 42,
        guild_id: Some(7),
        author: Author {
            id: author_id,
            name: format!("user{author_id}"),
            is_bot: false,
            is_admin: false,
        },
        content: content.to_string(),
    }
}

fn bot_message(id: u64, content: &str) -> IncomingMessage {
    let mut msg = message(id, 1, content);
    msg.author.is_bot = true;
    msg
}

async fn recv(rx: &mut mpsc::UnboundedReceiver<SendRecord>) -> SendRecord {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a send")
        .expect("send channel closed")
}

#[tokio::test]
async fn edit_lifecycle_retracts_and_repairs_under_the_original_id() {
    let (chat, mut sends, mut deletes) = MockChat::with_receivers();
    let flip = EchoHandler::new(chat.clone(), "flip-reply");
    let hello = EchoHandler::new(chat.clone(), "hello-reply");
    let mut registry = CommandRegistry::new();
    registry.register(spec("flip", flip.clone())).unwrap();
    registry.register(spec("hello", hello.clone())).unwrap();
    let router = Arc::new(EventRouter::new(
        "!",
        Arc::new(registry),
        chat.clone(),
        Arc::new(NullLog),
    ));

    let handle = router.handle_created(message(1, 100, "!flip")).await.unwrap();
    handle.await.unwrap();

    let first = recv(&mut sends).await;
    assert_eq!(first.text, "flip-reply");
    let r1 = router.tracker().get(1).await.expect("pairing recorded");
    assert_eq!(r1.message_id, first.message_id);

    let handle = router
        .handle_edited(Some("!flip"), message(1, 100, "!hello"))
        .await
        .unwrap();
    handle.await.unwrap();

    // The stale reply was deleted and a fresh pairing recorded under the
    // original source id.
    assert_eq!(deletes.recv().await, Some(first.message_id));
    let second = recv(&mut sends).await;
    assert_eq!(second.text, "hello-reply");
    let r2 = router.tracker().get(1).await.expect("new pairing recorded");
    assert_eq!(r2.message_id, second.message_id);
    assert_ne!(r1.message_id, r2.message_id);
    assert_eq!(hello.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn edit_without_prior_pairing_still_dispatches() {
    let (chat, mut sends, mut deletes) = MockChat::with_receivers();
    let hello = EchoHandler::new(chat.clone(), "hello-reply");
    let mut registry = CommandRegistry::new();
    registry.register(spec("hello", hello)).unwrap();
    let router = Arc::new(EventRouter::new(
        "!",
        Arc::new(registry),
        chat.clone(),
        Arc::new(NullLog),
    ));

    let handle = router
        .handle_edited(Some("just chatting"), message(5, 100, "!hello"))
        .await
        .unwrap();
    handle.await.unwrap();

    assert!(deletes.try_recv().is_err());
    assert_eq!(recv(&mut sends).await.text, "hello-reply");
    assert!(router.tracker().get(5).await.is_some());
}

#[tokio::test]
async fn update_without_known_prior_content_is_ignored() {
    let (chat, mut sends, mut deletes) = MockChat::with_receivers();
    let ask = EchoHandler::new(chat.clone(), "ask-reply");
    let mut registry = CommandRegistry::new();
    registry.register(spec("ask", ask.clone())).unwrap();
    let router = Arc::new(EventRouter::new(
        "!",
        Arc::new(registry),
        chat.clone(),
        Arc::new(NullLog),
    ));

    let handle = router
        .handle_created(message(1, 100, "!ask https://example.com"))
        .await
        .unwrap();
    handle.await.unwrap();
    recv(&mut sends).await;

    // A link unfurl arrives as an update event with identical content and,
    // on a cache miss, no pre-edit body. The reply must survive and the
    // handler must not run again.
    let handle = router
        .handle_edited(None, message(1, 100, "!ask https://example.com"))
        .await;
    assert!(handle.is_none());
    assert!(deletes.try_recv().is_err());
    assert!(sends.try_recv().is_err());
    assert_eq!(ask.calls.load(Ordering::SeqCst), 1);
    assert!(router.tracker().get(1).await.is_some());
}

#[tokio::test]
async fn unchanged_content_edit_is_ignored() {
    let (chat, mut sends, _deletes) = MockChat::with_receivers();
    let hello = EchoHandler::new(chat.clone(), "hello-reply");
    let mut registry = CommandRegistry::new();
    registry.register(spec("hello", hello)).unwrap();
    let router = Arc::new(EventRouter::new(
        "!",
        Arc::new(registry),
        chat.clone(),
        Arc::new(NullLog),
    ));

    let handle = router
        .handle_edited(Some("!hello"), message(1, 100, "!hello"))
        .await;
    assert!(handle.is_none());
    assert!(sends.try_recv().is_err());
}

#[tokio::test]
async fn concurrent_dispatch_pairs_each_reply_correctly() {
    let (chat, mut sends, _deletes) = MockChat::with_receivers();
    let slow = EchoHandler::slow(chat.clone(), "slow-reply", Duration::from_millis(100));
    let fast = EchoHandler::new(chat.clone(), "fast-reply");
    let mut registry = CommandRegistry::new();
    registry.register(spec("slow", slow)).unwrap();
    registry.register(spec("fast", fast)).unwrap();
    let router = Arc::new(EventRouter::new(
        "!",
        Arc::new(registry),
        chat.clone(),
        Arc::new(NullLog),
    ));

    let h1 = router.handle_created(message(1, 100, "!slow")).await.unwrap();
    let h2 = router.handle_created(message(2, 101, "!fast")).await.unwrap();

    // The fast command completes while the slow handler is still suspended.
    let first = recv(&mut sends).await;
    assert_eq!(first.text, "fast-reply");
    let second = recv(&mut sends).await;
    assert_eq!(second.text, "slow-reply");
    h1.await.unwrap();
    h2.await.unwrap();

    let slow_pairing = router.tracker().get(1).await.unwrap();
    let fast_pairing = router.tracker().get(2).await.unwrap();
    assert_eq!(fast_pairing.message_id, first.message_id);
    assert_eq!(slow_pairing.message_id, second.message_id);
}

#[tokio::test]
async fn unknown_command_sends_exactly_one_notice() {
    let (chat, mut sends, _deletes) = MockChat::with_receivers();
    let registry = CommandRegistry::new();
    let router = Arc::new(EventRouter::new(
        "!",
        Arc::new(registry),
        chat.clone(),
        Arc::new(NullLog),
    ));

    let handle = router
        .handle_created(message(1, 100, "!nonexistentcmd"))
        .await
        .unwrap();
    handle.await.unwrap();

    let notice = recv(&mut sends).await;
    assert!(notice.text.contains("don't recognize that command"));
    assert!(sends.try_recv().is_err());
    assert!(router.tracker().get(1).await.is_none());
    assert_eq!(chat.reactions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_argument_short_circuits_before_the_handler() {
    let (chat, mut sends, _deletes) = MockChat::with_receivers();
    let counting = Arc::new(CountingHandler {
        calls: AtomicUsize::new(0),
    });
    let mut registry = CommandRegistry::new();
    registry
        .register(CommandSpec {
            requires_args: true,
            ..spec("ask", counting.clone())
        })
        .unwrap();
    let router = Arc::new(EventRouter::new(
        "!",
        Arc::new(registry),
        chat.clone(),
        Arc::new(NullLog),
    ));

    let handle = router.handle_created(message(1, 100, "!ask")).await.unwrap();
    handle.await.unwrap();

    let notice = recv(&mut sends).await;
    assert!(notice.text.contains("missing some required arguments"));
    assert!(sends.try_recv().is_err());
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn permission_predicate_gates_the_handler() {
    let (chat, mut sends, _deletes) = MockChat::with_receivers();
    let counting = Arc::new(CountingHandler {
        calls: AtomicUsize::new(0),
    });
    let mut registry = CommandRegistry::new();
    registry
        .register(CommandSpec {
            permission: Some(|ctx| ctx.author.is_admin),
            ..spec("debug", counting.clone())
        })
        .unwrap();
    let router = Arc::new(EventRouter::new(
        "!",
        Arc::new(registry),
        chat.clone(),
        Arc::new(NullLog),
    ));

    let handle = router.handle_created(message(1, 100, "!debug")).await.unwrap();
    handle.await.unwrap();

    let notice = recv(&mut sends).await;
    assert!(notice.text.contains("permission"));
    assert_eq!(counting.calls.load(Ordering::SeqCst), 0);

    let mut admin_msg = message(2, 101, "!debug");
    admin_msg.author.is_admin = true;
    let handle = router.handle_created(admin_msg).await.unwrap();
    handle.await.unwrap();
    assert_eq!(counting.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failing_handler_does_not_affect_the_next_dispatch() {
    let (chat, mut sends, _deletes) = MockChat::with_receivers();
    let hello = EchoHandler::new(chat.clone(), "hello-reply");
    let mut registry = CommandRegistry::new();
    registry.register(spec("boom", Arc::new(FailingHandler))).unwrap();
    registry.register(spec("hello", hello)).unwrap();
    let router = Arc::new(EventRouter::new(
        "!",
        Arc::new(registry),
        chat.clone(),
        Arc::new(NullLog),
    ));

    let handle = router.handle_created(message(1, 100, "!boom")).await.unwrap();
    handle.await.unwrap();
    let notice = recv(&mut sends).await;
    assert!(notice.text.contains("An error occurred"));
    assert!(notice.text.contains("kaboom"));
    assert!(router.tracker().get(1).await.is_none());

    let handle = router.handle_created(message(2, 101, "!hello")).await.unwrap();
    handle.await.unwrap();
    assert_eq!(recv(&mut sends).await.text, "hello-reply");
}

#[tokio::test]
async fn non_prefixed_and_bot_messages_are_ignored() {
    let (chat, mut sends, _deletes) = MockChat::with_receivers();
    let hello = EchoHandler::new(chat.clone(), "hello-reply");
    let mut registry = CommandRegistry::new();
    registry.register(spec("hello", hello)).unwrap();
    let router = Arc::new(EventRouter::new(
        "!",
        Arc::new(registry),
        chat.clone(),
        Arc::new(NullLog),
    ));

    assert!(router
        .handle_created(message(1, 100, "hello everyone"))
        .await
        .is_none());
    assert!(router.handle_created(bot_message(2, "!hello")).await.is_none());
    assert!(sends.try_recv().is_err());
    assert_eq!(chat.reactions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn resolved_command_reacts_exactly_once() {
    let (chat, mut sends, _deletes) = MockChat::with_receivers();
    let hello = EchoHandler::new(chat.clone(), "hello-reply");
    let mut registry = CommandRegistry::new();
    registry.register(spec("hello", hello)).unwrap();
    let router = Arc::new(EventRouter::new(
        "!",
        Arc::new(registry),
        chat.clone(),
        Arc::new(NullLog),
    ));

    let handle = router.handle_created(message(1, 100, "!hello")).await.unwrap();
    handle.await.unwrap();
    recv(&mut sends).await;
    assert_eq!(chat.reactions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rerun_on_the_same_source_overwrites_the_pairing() {
    let (chat, mut sends, mut deletes) = MockChat::with_receivers();
    let flip = EchoHandler::new(chat.clone(), "flip-reply");
    let mut registry = CommandRegistry::new();
    registry.register(spec("flip", flip)).unwrap();
    let router = Arc::new(EventRouter::new(
        "!",
        Arc::new(registry),
        chat.clone(),
        Arc::new(NullLog),
    ));

    let handle = router.handle_created(message(1, 100, "!flip")).await.unwrap();
    handle.await.unwrap();
    let first = recv(&mut sends).await;

    // Whitespace tweak counts as a semantic edit; same command runs again.
    let handle = router
        .handle_edited(Some("!flip"), message(1, 100, "!flip "))
        .await
        .unwrap();
    handle.await.unwrap();
    assert_eq!(deletes.recv().await, Some(first.message_id));
    let second = recv(&mut sends).await;

    assert_eq!(router.tracker().len().await, 1);
    assert_eq!(
        router.tracker().get(1).await,
        Some(TrackedReply {
            channel_id: 42,
            message_id: second.message_id
        })
    );
}
