use std::fs::File;
use tracing::{error, info, info_span, level_filters::LevelFilter};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use config::Config;
use poise::serenity_prelude as serenity;
use tournament::SessionRegistry;

/// The command interpreter: keywords, parsed intents and the help listing.
mod commands;
/// Startup configuration.
mod config;
/// Routes Discord events into the tournament state.
mod event_handler;
/// Tournament state and the rules that govern it.
mod tournament;

mod utils;

/// Stores data used by the bot.
///
/// Accessible from the event handler through the framework.
pub struct Data {
    registry: SessionRegistry,
    command_prefix: String,
}

impl Data {
    /// Create a new data struct with an empty registry.
    fn new(command_prefix: String) -> Self {
        Self {
            registry: SessionRegistry::new(),
            command_prefix,
        }
    }
}

/// Convenience alias for the bot's data.
pub type BotData = Data;

/// A thread-safe Error type used by the bot.
pub type BotError = anyhow::Error;

#[tokio::main]
async fn main() {
    if let Err(e) = setup_tracing() {
        panic!("Error trying to setup tracing: {}", e);
    }

    if let Err(e) = run().await {
        panic!("Error trying to run the bot: {}", e);
    }
}

/// The main function that runs the bot.
async fn run() -> Result<(), BotError> {
    let config = {
        let setup_span = info_span!("bot_setup");
        let _guard = setup_span.enter();
        Config::from_env()?
    };

    let intents =
        serenity::GatewayIntents::GUILD_MESSAGES | serenity::GatewayIntents::MESSAGE_CONTENT;
    let command_prefix = config.command_prefix;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler::event_handler(ctx, event, framework, data))
            },
            on_error: |error| {
                Box::pin(async move {
                    match error {
                        poise::FrameworkError::EventHandler { error, event, .. } => {
                            error!("Error handling {:?}: {:?}", event.snake_case_name(), error)
                        }
                        poise::FrameworkError::Setup { error, .. } => {
                            error!("Error during setup: {:?}", error)
                        }
                        other => error!("Unhandled framework error: {}", other),
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |_ctx, ready, _framework| {
            Box::pin(async move {
                info!("Ready as {}", ready.user.name);
                Ok(Data::new(command_prefix))
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(config.discord_token, intents)
        .framework(framework)
        .await?;

    client.start().await?;

    Ok(())
}

/// Sets up the tracing subscriber for the bot.
fn setup_tracing() -> Result<(), BotError> {
    if cfg!(debug_assertions) {
        let filter = EnvFilter::from_default_env().add_directive("tourney_bot=info".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::NONE)
            .pretty()
            .init();

        return Ok(());
    }

    let log_file = File::create("debug.log")?;

    // Set up tracing with a filter that only logs errors in production
    tracing_subscriber::fmt::fmt()
        .with_span_events(FmtSpan::NONE)
        .with_max_level(LevelFilter::ERROR)
        .with_writer(log_file)
        .pretty()
        .init();

    Ok(())
}
