use poise::serenity_prelude::{self as serenity, UserId};
use tracing::{instrument, warn};

use crate::{
    commands::{help_text, parse},
    tournament::Outcome,
    utils::discord::{send_reply, DiscordDirectory},
    BotData, BotError,
};

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, BotData, BotError>,
    data: &BotData,
) -> Result<(), BotError> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            handle_message(ctx, framework.bot_id, data, new_message).await?;
        }
        _ => {}
    }
    Ok(())
}

/// Runs one chat message through the interpreter and the guild's tournament state, then replies.
#[instrument(skip(ctx, bot_id, data, msg), fields(guild = ?msg.guild_id, author = %msg.author.id))]
async fn handle_message(
    ctx: &serenity::Context,
    bot_id: UserId,
    data: &BotData,
    msg: &serenity::Message,
) -> Result<(), BotError> {
    // Tournaments belong to a guild, so DMs are never commands.
    let Some(guild_id) = msg.guild_id else {
        return Ok(());
    };
    let prefix = &data.command_prefix;
    let Some(parsed) = parse(&msg.content, msg.author.id, bot_id, prefix) else {
        return Ok(());
    };

    let result = parsed
        .inspect_err(|e| warn!("Unable to parse {:?}: {}", msg.content, e))
        .and_then(|intent| data.registry.dispatch(guild_id, msg.author.id, intent));

    // The registry entry is released by now, so awaiting below never blocks other commands.
    let reply = match result {
        Ok(Outcome::Reply(text)) => text,
        Ok(Outcome::Status(report)) => report.render(&DiscordDirectory::new(ctx)).await,
        Ok(Outcome::Help) => help_text(prefix),
        Err(e) => e.to_string(),
    };
    send_reply(ctx, msg.channel_id, &reply).await;

    Ok(())
}
