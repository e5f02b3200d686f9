use poise::serenity_prelude::UserId;

use super::models::{Membership, TeamId, Tournament, TournamentStatus};

/// Looks up how a user should be shown in a report.
///
/// Implementors may hit the network. A `None` means the user could not be resolved and is left
/// out of the report rather than failing it.
#[allow(async_fn_in_trait)]
pub trait UserDirectory {
    async fn display_name(&self, user_id: UserId) -> Option<String>;
}

/// One line of the roster.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    /// 1-based, the same number `draft` takes.
    pub position: usize,
    pub user_id: UserId,
    pub membership: Membership,
    pub team: Option<TeamId>,
}

/// An owned copy of everything `status` shows, taken while the community is locked so that names
/// can be resolved afterwards without holding the lock.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub name: String,
    pub status: TournamentStatus,
    pub roster: Vec<RosterEntry>,
    pub teams: Vec<String>,
}

impl StatusReport {
    pub fn new(name: String, tournament: &Tournament) -> Self {
        let roster = tournament
            .participants()
            .iter()
            .enumerate()
            .map(|(index, participant)| RosterEntry {
                position: index + 1,
                user_id: participant.user_id,
                membership: participant.membership,
                team: participant.team,
            })
            .collect();

        Self {
            name,
            status: tournament.status,
            roster,
            teams: tournament.teams().to_vec(),
        }
    }

    /// Renders the report as Discord markdown.
    ///
    /// The roster comes first in join order, with left participants struck through. It is followed
    /// by one group per team in team order and an Undrafted group last. Empty groups are skipped.
    pub async fn render<D: UserDirectory>(&self, directory: &D) -> String {
        let mut out = format!("Name: **{}**\nStatus: **{}**\n\n", self.name, self.status);

        let mut by_team: Vec<Vec<String>> = vec![Vec::new(); self.teams.len()];
        let mut undrafted: Vec<String> = Vec::new();

        for entry in &self.roster {
            let Some(display_name) = directory.display_name(entry.user_id).await else {
                continue;
            };

            let team_name = entry
                .team
                .and_then(|team| self.teams.get(team))
                .map(|team| format!("*{}*", team))
                .unwrap_or_default();
            let line = format!("{}: **{}**  {}", entry.position, display_name, team_name);
            let line = line.trim_end();
            out.push_str(&match entry.membership {
                Membership::Joined => format!("{}\n", line),
                Membership::Left => format!("~~{}~~\n", line),
            });

            match entry.team.and_then(|team| by_team.get_mut(team)) {
                Some(members) => members.push(display_name),
                None => undrafted.push(display_name),
            }
        }

        let groups = self
            .teams
            .iter()
            .map(|team| format!("*{}*", team))
            .zip(by_team)
            .chain(std::iter::once(("Undrafted".to_string(), undrafted)));
        for (group_name, members) in groups {
            if members.is_empty() {
                continue;
            }
            out.push_str(&format!("\n__{}__\n", group_name));
            for (index, member) in members.iter().enumerate() {
                out.push_str(&format!("{}: **{}**\n", index + 1, member));
            }
        }

        out.trim_end().to_string()
    }
}
