use poise::serenity_prelude::{self as serenity, ChannelId, UserId};
use tracing::{error, warn};

use crate::tournament::UserDirectory;

/// Resolves display names through the Discord API (or the cache, when the user is in it).
pub struct DiscordDirectory<'a> {
    ctx: &'a serenity::Context,
}

impl<'a> DiscordDirectory<'a> {
    pub fn new(ctx: &'a serenity::Context) -> Self {
        Self { ctx }
    }
}

impl UserDirectory for DiscordDirectory<'_> {
    async fn display_name(&self, user_id: UserId) -> Option<String> {
        match user_id.to_user(self.ctx).await {
            Ok(user) => Some(user.name),
            Err(e) => {
                warn!("Unable to resolve user {}: {}", user_id, e);
                None
            }
        }
    }
}

/// Sends `text` to the channel as a block quote.
///
/// Delivery failures are logged and dropped; the command that produced the reply has already been
/// applied either way.
pub async fn send_reply(ctx: &serenity::Context, channel_id: ChannelId, text: &str) {
    if let Err(e) = channel_id.say(&ctx.http, format!(">>> {}", text)).await {
        error!("Unable to send reply to channel {}: {}", channel_id, e);
    }
}
