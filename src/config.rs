use anyhow::anyhow;
use tracing::info;

use crate::BotError;

/// The prefix used when `COMMAND_PREFIX` is unset or blank.
pub const DEFAULT_PREFIX: &str = "!";

/// Startup configuration, read from the environment.
pub struct Config {
    pub discord_token: String,
    /// Messages must start with this to be treated as commands.
    pub command_prefix: String,
}

impl Config {
    /// Reads `DISCORD_TOKEN` and `COMMAND_PREFIX`.
    ///
    /// In debug builds a `.env` file is loaded first (bypassed with the --release flag).
    pub fn from_env() -> Result<Self, BotError> {
        #[cfg(debug_assertions)]
        dotenv::dotenv().ok();

        let config = Self::from_vars(
            std::env::var("DISCORD_TOKEN").ok(),
            std::env::var("COMMAND_PREFIX").ok(),
        )?;
        info!("Successfully loaded Discord Token");
        info!("Using command prefix {}", config.command_prefix);

        Ok(config)
    }

    fn from_vars(token: Option<String>, prefix: Option<String>) -> Result<Self, BotError> {
        let discord_token = token
            .filter(|token| !token.trim().is_empty())
            .ok_or(anyhow!("Expected DISCORD_TOKEN as an environment variable"))?;
        let command_prefix = prefix
            .map(|prefix| prefix.trim().to_string())
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        Ok(Self {
            discord_token,
            command_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_required() {
        assert!(Config::from_vars(None, None).is_err());
        assert!(Config::from_vars(Some("  ".to_string()), None).is_err());
    }

    #[test]
    fn prefix_defaults_when_unset_or_blank() {
        let config = Config::from_vars(Some("token".to_string()), None).unwrap();
        assert_eq!(config.command_prefix, DEFAULT_PREFIX);

        let config =
            Config::from_vars(Some("token".to_string()), Some(" ".to_string())).unwrap();
        assert_eq!(config.command_prefix, DEFAULT_PREFIX);

        let config =
            Config::from_vars(Some("token".to_string()), Some("?".to_string())).unwrap();
        assert_eq!(config.command_prefix, "?");
        assert_eq!(config.discord_token, "token");
    }
}
