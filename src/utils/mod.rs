/// Serenity-backed collaborators used by the event handler.
pub mod discord;
/// Error types shared across the bot.
pub mod error;
