use std::collections::HashMap;

use poise::serenity_prelude::UserId;
use serde::Serialize;
use strum::Display;

/// The status of a tournament. Moves strictly forward: Setup, then Started, then Finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, Default)]
pub enum TournamentStatus {
    #[default]
    Setup,
    Started,
    Finished,
}

/// Whether a participant is currently taking part in the tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum Membership {
    Joined,
    Left,
}

/// Index into [`Tournament::teams`]. Team ids are stable for the lifetime of the tournament.
pub type TeamId = usize;

/// A user's membership record within one tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub user_id: UserId,
    pub membership: Membership,
    /// `None` while undrafted. Once set it is never cleared.
    pub team: Option<TeamId>,
}

impl Participant {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            membership: Membership::Joined,
            team: None,
        }
    }
}

/// One named competition within a community.
///
/// `participants` is the source of truth and is only ever appended to. `positions` indexes it by
/// user id and is updated in the same call that appends, so the two never disagree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Tournament {
    pub status: TournamentStatus,
    participants: Vec<Participant>,
    #[serde(skip)]
    positions: HashMap<UserId, usize>,
    teams: Vec<String>,
}

impl Tournament {
    pub fn new() -> Self {
        Self::default()
    }

    /// Participants in join order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Team names, indexed by [`TeamId`].
    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn participant(&self, user_id: UserId) -> Option<&Participant> {
        self.positions
            .get(&user_id)
            .map(|&index| &self.participants[index])
    }

    pub fn participant_mut(&mut self, user_id: UserId) -> Option<&mut Participant> {
        let index = *self.positions.get(&user_id)?;
        self.participants.get_mut(index)
    }

    /// Looks up a participant by its 1-based display position.
    #[cfg(test)]
    pub fn participant_at(&self, position: usize) -> Option<&Participant> {
        position
            .checked_sub(1)
            .and_then(|index| self.participants.get(index))
    }

    pub(crate) fn participant_at_mut(&mut self, position: usize) -> Option<&mut Participant> {
        let index = position.checked_sub(1)?;
        self.participants.get_mut(index)
    }

    /// Appends a new participant. The caller must have checked the user is not already present.
    pub(crate) fn push_participant(&mut self, participant: Participant) {
        debug_assert!(!self.positions.contains_key(&participant.user_id));
        self.positions
            .insert(participant.user_id, self.participants.len());
        self.participants.push(participant);
    }

    /// Appends a team named after its 1-based position and returns its id.
    pub(crate) fn push_team(&mut self) -> TeamId {
        let team_id = self.teams.len();
        self.teams.push(format!("Team {}", team_id + 1));
        team_id
    }

    pub fn team_name(&self, team_id: TeamId) -> Option<&str> {
        self.teams.get(team_id).map(String::as_str)
    }
}

/// One chat server's isolated tournament state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Community {
    /// The tournament used when a command omits a name. Empty until the first `new`.
    pub current: String,
    pub(crate) tournaments: HashMap<String, Tournament>,
    /// Every tournament name ever created, oldest first.
    pub history: Vec<String>,
}

impl Community {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tournament(&self, name: &str) -> Option<&Tournament> {
        self.tournaments.get(name)
    }

    pub fn tournament_mut(&mut self, name: &str) -> Option<&mut Tournament> {
        self.tournaments.get_mut(name)
    }

    /// Substitutes the current tournament when `explicit` is empty.
    pub fn target_name<'a>(&'a self, explicit: &'a str) -> &'a str {
        if explicit.is_empty() {
            &self.current
        } else {
            explicit
        }
    }
}
