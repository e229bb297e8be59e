//! Serenity adapter: maps gateway events into the router and outgoing
//! payloads onto the Discord HTTP API.

use std::sync::Arc;

use async_trait::async_trait;
use retrobot_core::{Author, ChatClient, ChatError, Embed, IncomingMessage, Outgoing};
use serenity::builder::{
    CreateAttachment, CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage,
};
use serenity::gateway::ActivityData;
use serenity::http::{Http, HttpError};
use serenity::model::channel::{Message, ReactionType};
use serenity::model::colour::Colour;
use serenity::model::event::MessageUpdateEvent;
use serenity::model::gateway::Ready;
use serenity::model::id::{ChannelId, MessageId};
use serenity::prelude::{Context, EventHandler};
use tracing::{error, info, warn};

use retrobot_router::EventRouter;

/// [`ChatClient`] backed by a standalone serenity HTTP client.
pub struct SerenityChat {
    http: Arc<Http>,
}

impl SerenityChat {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

fn to_create_embed(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new()
        .title(embed.title.clone())
        .colour(Colour::new(embed.color));
    if !embed.description.is_empty() {
        builder = builder.description(embed.description.clone());
    }
    for field in &embed.fields {
        builder = builder.field(field.name.clone(), field.value.clone(), field.inline);
    }
    if let Some(footer) = &embed.footer {
        builder = builder.footer(CreateEmbedFooter::new(footer.clone()));
    }
    builder
}

fn map_chat_err(e: serenity::Error) -> ChatError {
    if let serenity::Error::Http(HttpError::UnsuccessfulRequest(resp)) = &e {
        match resp.status_code.as_u16() {
            404 => return ChatError::NotFound,
            403 => return ChatError::Forbidden,
            _ => {}
        }
    }
    ChatError::Other(e.to_string())
}

#[async_trait]
impl ChatClient for SerenityChat {
    async fn send(&self, channel_id: u64, message: Outgoing) -> Result<u64, ChatError> {
        let channel = ChannelId::new(channel_id);
        let builder = match message {
            Outgoing::Text(text) => CreateMessage::new().content(text),
            Outgoing::Embed(embed) => CreateMessage::new().embed(to_create_embed(&embed)),
            Outgoing::EmbedWithFile(embed, path) => {
                let attachment = CreateAttachment::path(&path)
                    .await
                    .map_err(map_chat_err)?;
                CreateMessage::new()
                    .embed(to_create_embed(&embed))
                    .add_file(attachment)
            }
            Outgoing::File(path) => {
                let attachment = CreateAttachment::path(&path)
                    .await
                    .map_err(map_chat_err)?;
                CreateMessage::new().add_file(attachment)
            }
        };
        let sent = channel
            .send_message(&*self.http, builder)
            .await
            .map_err(map_chat_err)?;
        Ok(sent.id.get())
    }

    async fn edit(
        &self,
        channel_id: u64,
        message_id: u64,
        message: Outgoing,
    ) -> Result<(), ChatError> {
        let builder = match message {
            Outgoing::Text(text) => EditMessage::new().content(text),
            Outgoing::Embed(embed) => EditMessage::new()
                .content("")
                .embed(to_create_embed(&embed)),
            Outgoing::EmbedWithFile(..) | Outgoing::File(..) => {
                return Err(ChatError::Other(
                    "cannot edit attachments into an existing message".to_string(),
                ));
            }
        };
        ChannelId::new(channel_id)
            .edit_message(&*self.http, MessageId::new(message_id), builder)
            .await
            .map_err(map_chat_err)?;
        Ok(())
    }

    async fn delete(&self, channel_id: u64, message_id: u64) -> Result<(), ChatError> {
        ChannelId::new(channel_id)
            .delete_message(&*self.http, MessageId::new(message_id))
            .await
            .map_err(map_chat_err)
    }

    async fn react(&self, channel_id: u64, message_id: u64, emoji: &str) -> Result<(), ChatError> {
        self.http
            .create_reaction(
                ChannelId::new(channel_id),
                MessageId::new(message_id),
                &ReactionType::Unicode(emoji.to_string()),
            )
            .await
            .map_err(map_chat_err)
    }
}

/// Serenity [`EventHandler`] that feeds gateway events into the router.
pub struct RouterEventHandler {
    router: Arc<EventRouter>,
}

impl RouterEventHandler {
    pub fn new(router: Arc<EventRouter>) -> Self {
        Self { router }
    }

    async fn to_incoming(&self, ctx: &Context, msg: &Message) -> IncomingMessage {
        // The admin check costs API calls, so only resolve it for messages
        // that can actually dispatch a command.
        let is_admin = if msg.author.bot || !msg.content.starts_with(self.router.prefix()) {
            false
        } else {
            match msg.guild_id {
                Some(guild_id) => is_guild_admin(ctx, guild_id, msg.author.id).await,
                None => false,
            }
        };
        IncomingMessage {
            id: msg.id.get(),
            channel_id: msg.channel_id.get(),
            guild_id: msg.guild_id.map(|g| g.get()),
            author: Author {
                id: msg.author.id.get(),
                name: msg.author.name.clone(),
                is_bot: msg.author.bot,
                is_admin,
            },
            content: msg.content.clone(),
        }
    }
}

async fn is_guild_admin(
    ctx: &Context,
    guild_id: serenity::model::id::GuildId,
    user_id: serenity::model::id::UserId,
) -> bool {
    let guild = match guild_id.to_partial_guild(&ctx.http).await {
        Ok(guild) => guild,
        Err(e) => {
            warn!(guild_id = guild_id.get(), error = %e, "failed to fetch guild for admin check");
            return false;
        }
    };
    if guild.owner_id == user_id {
        return true;
    }
    let member = match guild_id.member(&ctx.http, user_id).await {
        Ok(member) => member,
        Err(e) => {
            warn!(guild_id = guild_id.get(), error = %e, "failed to fetch member for admin check");
            return false;
        }
    };
    member.roles.iter().any(|role_id| {
        guild
            .roles
            .get(role_id)
            .is_some_and(|role| role.permissions.administrator())
    })
}

#[async_trait]
impl EventHandler for RouterEventHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "connected to Discord");
        ctx.set_activity(Some(ActivityData::playing("with commands")));
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let incoming = self.to_incoming(&ctx, &msg).await;
        self.router.handle_created(incoming).await;
    }

    async fn message_update(
        &self,
        ctx: Context,
        old_if_available: Option<Message>,
        new: Option<Message>,
        event: MessageUpdateEvent,
    ) {
        let after = match new {
            Some(msg) => msg,
            // The cache missed; fetch the post-edit message ourselves.
            None => match event.channel_id.message(&ctx.http, event.id).await {
                Ok(msg) => msg,
                Err(e) => {
                    error!(message_id = event.id.get(), error = %e, "failed to fetch edited message");
                    return;
                }
            },
        };
        let before_content = old_if_available.map(|m| m.content);
        let incoming = self.to_incoming(&ctx, &after).await;
        self.router
            .handle_edited(before_content.as_deref(), incoming)
            .await;
    }
}
