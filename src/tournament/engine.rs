use poise::serenity_prelude::UserId;

use crate::{
    commands::Intent,
    utils::error::TournamentError::{self, *},
};

use super::{
    models::{Community, Membership, Participant, Tournament, TournamentStatus},
    registry::{resolve_tournament, resolve_tournament_ref},
    report::StatusReport,
};

/// What a successfully applied command produced.
#[derive(Debug)]
pub enum Outcome {
    /// A plain confirmation to send back to the channel.
    Reply(String),
    /// A read-only snapshot that still needs display names resolved before it can be sent.
    Status(StatusReport),
    /// The command listing.
    Help,
}

/// Rejects any further roster changes once a tournament is over.
fn ensure_not_finished(name: &str, tournament: &Tournament) -> Result<(), TournamentError> {
    match tournament.status {
        TournamentStatus::Finished => Err(TournamentFinished(name.to_string())),
        TournamentStatus::Setup | TournamentStatus::Started => Ok(()),
    }
}

impl Community {
    /// Applies a parsed command on behalf of `author`.
    ///
    /// Every operation validates before it writes, so an `Err` always leaves the community
    /// exactly as it was.
    pub fn apply(&mut self, author: UserId, intent: Intent) -> Result<Outcome, TournamentError> {
        match intent {
            Intent::New { name } => self.create(&name).map(Outcome::Reply),
            Intent::Join { name } => self.join(&name, author).map(Outcome::Reply),
            Intent::Leave { name } => self.leave(&name, author).map(Outcome::Reply),
            Intent::Captain { name } => self.captain(&name, author).map(Outcome::Reply),
            Intent::Draft { position, name } => {
                self.draft(&name, position, author).map(Outcome::Reply)
            }
            Intent::Start { name } => self.start(&name).map(Outcome::Reply),
            Intent::Finish { name } => self.finish(&name).map(Outcome::Reply),
            Intent::Status { name } => self.status(&name).map(Outcome::Status),
            Intent::Help => Ok(Outcome::Help),
            Intent::Uncaptain => Err(NotImplemented("uncaptain".to_string())),
            Intent::Kick => Err(NotImplemented("kick".to_string())),
        }
    }

    /// Creates a tournament in `Setup` and makes it the current one.
    pub fn create(&mut self, name: &str) -> Result<String, TournamentError> {
        if name.trim().is_empty() {
            return Err(EmptyName);
        }
        if self.tournaments.contains_key(name) {
            return Err(DuplicateName(name.to_string()));
        }

        self.tournaments.insert(name.to_string(), Tournament::new());
        self.current = name.to_string();
        self.history.push(name.to_string());

        Ok(format!("Tournament created with name: **{}**", name))
    }

    /// Joins, rejoins, or confirms an existing membership. Never creates a second record.
    pub fn join(&mut self, name: &str, user_id: UserId) -> Result<String, TournamentError> {
        let (name, tournament) = resolve_tournament(self, name)?;
        ensure_not_finished(&name, tournament)?;

        match tournament.participant_mut(user_id) {
            Some(participant) => match participant.membership {
                Membership::Left => {
                    participant.membership = Membership::Joined;
                    Ok(format!("Rejoined tournament **{}**", name))
                }
                Membership::Joined => Ok(format!("Already joined tournament **{}**", name)),
            },
            None => {
                tournament.push_participant(Participant::new(user_id));
                Ok(format!("Joined tournament **{}**", name))
            }
        }
    }

    /// Marks the user as left. The record and any team assignment are kept.
    pub fn leave(&mut self, name: &str, user_id: UserId) -> Result<String, TournamentError> {
        let (name, tournament) = resolve_tournament(self, name)?;
        ensure_not_finished(&name, tournament)?;

        let participant = tournament
            .participant_mut(user_id)
            .ok_or_else(|| ParticipantNotFound(name.clone()))?;
        participant.membership = Membership::Left;

        Ok(format!("Left tournament **{}**", name))
    }

    /// Opens a new team and binds the caller to it.
    ///
    /// A participant who is already a captain can do this again; they simply move to the newest
    /// team and the old one keeps whoever was drafted into it.
    pub fn captain(&mut self, name: &str, user_id: UserId) -> Result<String, TournamentError> {
        let (name, tournament) = resolve_tournament(self, name)?;
        ensure_not_finished(&name, tournament)?;

        if tournament.participant(user_id).is_none() {
            return Err(ParticipantNotFound(name));
        }
        let team_id = tournament.push_team();
        let team_name = tournament.team_name(team_id).unwrap_or_default().to_string();
        if let Some(participant) = tournament.participant_mut(user_id) {
            participant.team = Some(team_id);
        }

        Ok(format!("User now captain of *{}*", team_name))
    }

    /// Assigns the participant at the 1-based `position` to the caller's team.
    pub fn draft(
        &mut self,
        name: &str,
        position: i64,
        captain: UserId,
    ) -> Result<String, TournamentError> {
        let (name, tournament) = resolve_tournament(self, name)?;
        ensure_not_finished(&name, tournament)?;

        let team_id = tournament
            .participant(captain)
            .and_then(|participant| participant.team)
            .ok_or(NotCaptain)?;
        let team_name = tournament.team_name(team_id).unwrap_or_default().to_string();
        let participants = tournament.participants().len();

        let target = usize::try_from(position)
            .ok()
            .and_then(|position| tournament.participant_at_mut(position))
            .ok_or(IndexOutOfRange {
                position,
                participants,
            })?;
        if target.team.is_some() {
            return Err(AlreadyDrafted);
        }
        target.team = Some(team_id);

        Ok(format!("Player now drafted in *{}*", team_name))
    }

    /// Marks the tournament as started. Starting twice is fine.
    pub fn start(&mut self, name: &str) -> Result<String, TournamentError> {
        let (name, tournament) = resolve_tournament(self, name)?;
        ensure_not_finished(&name, tournament)?;

        tournament.status = TournamentStatus::Started;

        Ok(format!("Tournament **{}** started", name))
    }

    pub fn finish(&mut self, name: &str) -> Result<String, TournamentError> {
        let (name, tournament) = resolve_tournament(self, name)?;

        tournament.status = TournamentStatus::Finished;

        Ok(format!("Tournament **{}** finished", name))
    }

    pub fn status(&self, name: &str) -> Result<StatusReport, TournamentError> {
        let (name, tournament) = resolve_tournament_ref(self, name)?;
        Ok(StatusReport::new(name, tournament))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserId {
        UserId::new(1)
    }

    fn bob() -> UserId {
        UserId::new(2)
    }

    fn carol() -> UserId {
        UserId::new(3)
    }

    fn community_with(name: &str, users: &[UserId]) -> Community {
        let mut community = Community::new();
        community.create(name).unwrap();
        for &user in users {
            community.join("", user).unwrap();
        }
        community
    }

    fn cup(community: &Community) -> &Tournament {
        community.tournament("Cup").unwrap()
    }

    #[test]
    fn creates_tournament_in_setup() {
        let mut community = Community::new();
        community.create("Cup").unwrap();

        let tournament = cup(&community);
        assert_eq!(tournament.status, TournamentStatus::Setup);
        assert!(tournament.participants().is_empty());
        assert!(tournament.teams().is_empty());
        assert_eq!(community.current, "Cup");
        assert_eq!(community.history, vec!["Cup".to_string()]);
    }

    #[test]
    fn rejects_duplicate_and_blank_names() {
        let mut community = community_with("Cup", &[alice()]);

        assert_eq!(
            community.create("Cup"),
            Err(DuplicateName("Cup".to_string()))
        );
        assert_eq!(community.create(""), Err(EmptyName));
        assert_eq!(community.create("   "), Err(EmptyName));
        assert_eq!(community.tournaments.len(), 1);
        assert_eq!(community.history.len(), 1);
        assert_eq!(cup(&community).participants().len(), 1);
    }

    #[test]
    fn newest_tournament_becomes_current() {
        let mut community = community_with("Cup", &[]);
        community.create("League").unwrap();
        community.join("", alice()).unwrap();

        assert_eq!(community.current, "League");
        assert_eq!(community.history, vec!["Cup", "League"]);
        assert!(cup(&community).participants().is_empty());
        assert_eq!(
            community.tournament("League").unwrap().participants().len(),
            1
        );

        community.join("Cup", bob()).unwrap();
        assert_eq!(cup(&community).participants()[0].user_id, bob());
    }

    #[test]
    fn join_without_any_tournament_is_not_found() {
        let mut community = Community::new();
        assert_eq!(
            community.join("", alice()),
            Err(TournamentNotFound(String::new()))
        );
        assert_eq!(
            community.join("Cup", alice()),
            Err(TournamentNotFound("Cup".to_string()))
        );
    }

    #[test]
    fn repeated_join_is_idempotent() {
        let mut community = community_with("Cup", &[alice()]);

        let reply = community.join("", alice()).unwrap();
        assert!(reply.starts_with("Already joined"));
        community.join("Cup", alice()).unwrap();

        assert_eq!(cup(&community).participants().len(), 1);
    }

    #[test]
    fn rejoin_reuses_the_same_record() {
        let mut community = community_with("Cup", &[alice(), bob()]);
        community.captain("", alice()).unwrap();

        community.leave("", alice()).unwrap();
        assert_eq!(
            cup(&community).participant(alice()).unwrap().membership,
            Membership::Left
        );
        assert_eq!(cup(&community).participant(alice()).unwrap().team, Some(0));

        let reply = community.join("", alice()).unwrap();
        assert!(reply.starts_with("Rejoined"));

        let tournament = cup(&community);
        assert_eq!(tournament.participants().len(), 2);
        let first = tournament.participant_at(1).unwrap();
        assert_eq!(first.user_id, alice());
        assert_eq!(first.membership, Membership::Joined);
        assert_eq!(first.team, Some(0));
    }

    #[test]
    fn leave_requires_a_record() {
        let mut community = community_with("Cup", &[alice()]);
        assert_eq!(
            community.leave("", bob()),
            Err(ParticipantNotFound("Cup".to_string()))
        );
        assert_eq!(
            community.leave("Other", alice()),
            Err(TournamentNotFound("Other".to_string()))
        );
    }

    #[test]
    fn captain_appends_exactly_one_team() {
        let mut community = community_with("Cup", &[alice(), bob()]);

        community.captain("", alice()).unwrap();
        assert_eq!(cup(&community).teams(), &["Team 1"]);
        assert_eq!(cup(&community).participant(alice()).unwrap().team, Some(0));

        community.captain("", bob()).unwrap();
        assert_eq!(cup(&community).teams(), &["Team 1", "Team 2"]);
        assert_eq!(cup(&community).participant(bob()).unwrap().team, Some(1));
    }

    #[test]
    fn captain_requires_participation() {
        let mut community = community_with("Cup", &[alice()]);
        assert_eq!(
            community.captain("", bob()),
            Err(ParticipantNotFound("Cup".to_string()))
        );
        assert!(cup(&community).teams().is_empty());
    }

    #[test]
    fn captain_twice_moves_to_newest_team() {
        let mut community = community_with("Cup", &[alice()]);
        community.captain("", alice()).unwrap();
        community.captain("", alice()).unwrap();

        assert_eq!(cup(&community).teams().len(), 2);
        assert_eq!(cup(&community).participant(alice()).unwrap().team, Some(1));
    }

    #[test]
    fn draft_assigns_to_captains_team() {
        let mut community = community_with("Cup", &[alice(), bob()]);
        community.captain("", alice()).unwrap();

        let reply = community.draft("", 2, alice()).unwrap();
        assert_eq!(reply, "Player now drafted in *Team 1*");
        assert_eq!(cup(&community).participant(bob()).unwrap().team, Some(0));
    }

    #[test]
    fn draft_bounds_are_checked() {
        let mut community = community_with("Cup", &[alice(), bob()]);
        community.captain("", alice()).unwrap();

        for position in [0, -1, 3, i64::MAX] {
            assert_eq!(
                community.draft("", position, alice()),
                Err(IndexOutOfRange {
                    position,
                    participants: 2
                })
            );
        }
        assert_eq!(cup(&community).participant(bob()).unwrap().team, None);
    }

    #[test]
    fn draft_succeeds_once_per_target() {
        let mut community = community_with("Cup", &[alice(), bob(), carol()]);
        community.captain("", alice()).unwrap();
        community.captain("", carol()).unwrap();

        community.draft("", 2, alice()).unwrap();
        assert_eq!(community.draft("", 2, alice()), Err(AlreadyDrafted));
        assert_eq!(community.draft("", 2, carol()), Err(AlreadyDrafted));
        assert_eq!(community.draft("", 1, carol()), Err(AlreadyDrafted));
        assert_eq!(cup(&community).participant(bob()).unwrap().team, Some(0));
    }

    #[test]
    fn draft_by_non_captain_never_mutates() {
        let mut community = community_with("Cup", &[alice(), bob()]);

        assert_eq!(community.draft("", 1, bob()), Err(NotCaptain));
        assert_eq!(community.draft("", 2, carol()), Err(NotCaptain));

        let tournament = cup(&community);
        assert!(tournament.teams().is_empty());
        assert!(tournament.participants().iter().all(|p| p.team.is_none()));
    }

    #[test]
    fn start_is_idempotent() {
        let mut community = community_with("Cup", &[alice(), bob()]);
        community.captain("", alice()).unwrap();

        community.start("").unwrap();
        community.start("Cup").unwrap();

        let tournament = cup(&community);
        assert_eq!(tournament.status, TournamentStatus::Started);
        assert_eq!(tournament.participants().len(), 2);
        assert_eq!(tournament.teams().len(), 1);
    }

    #[test]
    fn finished_is_terminal() {
        let mut community = community_with("Cup", &[alice(), bob()]);
        community.captain("", alice()).unwrap();
        community.finish("").unwrap();

        let finished = Err(TournamentFinished("Cup".to_string()));
        assert_eq!(community.start(""), finished);
        assert_eq!(community.join("", carol()), finished);
        assert_eq!(community.leave("", bob()), finished);
        assert_eq!(community.captain("", bob()), finished);
        assert_eq!(community.draft("", 2, alice()), finished);

        assert!(community.finish("").is_ok());
        assert!(community.status("").is_ok());
        let tournament = cup(&community);
        assert_eq!(tournament.status, TournamentStatus::Finished);
        assert_eq!(tournament.participant(bob()).unwrap().team, None);
    }

    #[test]
    fn status_only_needs_shared_access() {
        let mut community = community_with("Cup", &[alice(), bob()]);
        community.captain("", alice()).unwrap();

        let shared: &Community = &community;
        let report = shared.status("").unwrap();
        assert_eq!(report.name, "Cup");
        assert_eq!(report.roster.len(), 2);
        assert_eq!(report.teams, vec!["Team 1".to_string()]);
        assert_eq!(
            shared.status("League").unwrap_err(),
            TournamentNotFound("League".to_string())
        );
    }

    #[test]
    fn apply_routes_reserved_commands() {
        let mut community = community_with("Cup", &[alice()]);

        assert!(matches!(
            community.apply(alice(), Intent::Help),
            Ok(Outcome::Help)
        ));
        assert_eq!(
            community.apply(alice(), Intent::Kick).unwrap_err(),
            NotImplemented("kick".to_string())
        );
        assert_eq!(
            community.apply(alice(), Intent::Uncaptain).unwrap_err(),
            NotImplemented("uncaptain".to_string())
        );
        assert!(matches!(
            community.apply(
                alice(),
                Intent::Status {
                    name: String::new()
                }
            ),
            Ok(Outcome::Status(_))
        ));
    }
}
