use thiserror::Error;

/// Every way a tournament command can be rejected.
///
/// The `Display` text of each variant is what the user sees in the reply, so keep them short and
/// free of internal detail. None of these are fatal: the community state is left untouched
/// whenever one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TournamentError {
    #[error("New tournament must have a name")]
    EmptyName,
    #[error("Tournament with same name found, use another name")]
    DuplicateName(String),
    #[error("Tournament not found: **{0}**")]
    TournamentNotFound(String),
    #[error("User not found in tournament **{0}**")]
    ParticipantNotFound(String),
    #[error("Can't draft if not in team")]
    NotCaptain,
    #[error("Position {position} is out of range, there are {participants} players")]
    IndexOutOfRange { position: i64, participants: usize },
    #[error("Player already drafted")]
    AlreadyDrafted,
    #[error("{0}")]
    MalformedArgument(String),
    #[error("Command `{keyword}` not found, try __{prefix}help__")]
    UnknownCommand { keyword: String, prefix: String },
    #[error("**{0}** is not implemented yet")]
    NotImplemented(String),
    #[error("Tournament **{0}** is finished")]
    TournamentFinished(String),
}
