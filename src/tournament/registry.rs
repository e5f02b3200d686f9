use dashmap::{mapref::one::RefMut, DashMap};
use poise::serenity_prelude::{GuildId, UserId};
use tracing::{debug, enabled, info, instrument, warn, Level};

use crate::{
    commands::Intent,
    utils::error::TournamentError::{self, TournamentNotFound},
};

use super::{
    engine::Outcome,
    models::{Community, Tournament},
};

/// Holds one [`Community`] per guild.
///
/// Each guild lives in its own DashMap entry, so a command holds only its own guild's shard while
/// it runs. Commands for one guild are applied one at a time; other guilds are not blocked.
/// Never hold a [`RefMut`] from this registry across an `.await`.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    communities: DashMap<GuildId, Community>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the guild's community, creating an empty one on first access.
    pub fn resolve_community(&self, guild_id: GuildId) -> RefMut<'_, GuildId, Community> {
        self.communities.entry(guild_id).or_default()
    }

    /// Clones the guild's community, if it has ever issued a command.
    #[cfg(test)]
    pub fn snapshot(&self, guild_id: GuildId) -> Option<Community> {
        self.communities
            .get(&guild_id)
            .map(|community| community.value().clone())
    }

    /// Applies a command to the guild's state and logs how it went.
    #[instrument(skip(self, intent), fields(command = %intent.kind()))]
    pub fn dispatch(
        &self,
        guild_id: GuildId,
        author: UserId,
        intent: Intent,
    ) -> Result<Outcome, TournamentError> {
        let kind = intent.kind();
        let mut community = self.resolve_community(guild_id);
        let result = community.apply(author, intent);

        match &result {
            Ok(_) => info!("Applied {} for {} in guild {}", kind, author, guild_id),
            Err(e) => warn!("Rejected {} for {} in guild {}: {}", kind, author, guild_id, e),
        }

        if result.is_ok() && kind.mutates() && enabled!(Level::DEBUG) {
            match serde_json::to_string(&*community) {
                Ok(state) => debug!("Guild {} state: {}", guild_id, state),
                Err(e) => warn!("Unable to serialize state for guild {}: {}", guild_id, e),
            }
        }

        result
    }
}

/// Looks up the named tournament, or the current one when `explicit` is empty.
///
/// Returns the resolved name alongside the tournament so replies can say which one was used.
pub fn resolve_tournament<'c>(
    community: &'c mut Community,
    explicit: &str,
) -> Result<(String, &'c mut Tournament), TournamentError> {
    let name = community.target_name(explicit).to_string();
    match community.tournament_mut(&name) {
        Some(tournament) => Ok((name, tournament)),
        None => Err(TournamentNotFound(name)),
    }
}

/// Read-only counterpart of [`resolve_tournament`].
pub fn resolve_tournament_ref<'c>(
    community: &'c Community,
    explicit: &str,
) -> Result<(String, &'c Tournament), TournamentError> {
    let name = community.target_name(explicit).to_string();
    match community.tournament(&name) {
        Some(tournament) => Ok((name, tournament)),
        None => Err(TournamentNotFound(name)),
    }
}
