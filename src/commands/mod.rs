use poise::serenity_prelude::UserId;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::utils::error::TournamentError::{self, *};

/// Every keyword the bot answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CommandKind {
    New,
    Join,
    Leave,
    Captain,
    Uncaptain,
    Draft,
    Start,
    Status,
    Finish,
    Kick,
    Help,
}

impl CommandKind {
    /// Argument synopsis and a one-line description, as shown by `help`.
    pub fn usage(&self) -> (&'static str, &'static str) {
        use CommandKind::*;
        match self {
            New => ("<name>", "Create a tournament and make it the current one"),
            Join => ("[name]", "Join or rejoin a tournament"),
            Leave => ("[name]", "Leave a tournament"),
            Captain => ("[name]", "Become captain of a new team"),
            Uncaptain => ("", "Not implemented yet"),
            Draft => ("<position> [name]", "Draft the player at that roster position"),
            Start => ("[name]", "Start a tournament"),
            Status => ("[name]", "Show the roster and teams"),
            Finish => ("[name]", "Finish a tournament"),
            Kick => ("", "Not implemented yet"),
            Help => ("", "Show this message"),
        }
    }

    /// Whether a successful run of this command can change state.
    pub fn mutates(&self) -> bool {
        use CommandKind::*;
        match self {
            New | Join | Leave | Captain | Draft | Start | Finish => true,
            Uncaptain | Status | Kick | Help => false,
        }
    }
}

/// A parsed command, ready to be applied to a community.
///
/// An empty `name` means "the current tournament".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    New { name: String },
    Join { name: String },
    Leave { name: String },
    Captain { name: String },
    Uncaptain,
    Draft { position: i64, name: String },
    Start { name: String },
    Status { name: String },
    Finish { name: String },
    Kick,
    Help,
}

impl Intent {
    pub fn kind(&self) -> CommandKind {
        match self {
            Intent::New { .. } => CommandKind::New,
            Intent::Join { .. } => CommandKind::Join,
            Intent::Leave { .. } => CommandKind::Leave,
            Intent::Captain { .. } => CommandKind::Captain,
            Intent::Uncaptain => CommandKind::Uncaptain,
            Intent::Draft { .. } => CommandKind::Draft,
            Intent::Start { .. } => CommandKind::Start,
            Intent::Status { .. } => CommandKind::Status,
            Intent::Finish { .. } => CommandKind::Finish,
            Intent::Kick => CommandKind::Kick,
            Intent::Help => CommandKind::Help,
        }
    }
}

/// Turns a chat message into an [`Intent`].
///
/// Returns `None` when the message should be ignored entirely: it was sent by the bot itself or
/// does not start with `prefix`. Otherwise returns the intent, or the error to reply with when the
/// keyword is unknown or the arguments cannot be read.
///
/// Tournament names are every token after the keyword joined with the whitespace removed.
pub fn parse(
    content: &str,
    author: UserId,
    self_id: UserId,
    prefix: &str,
) -> Option<Result<Intent, TournamentError>> {
    if author == self_id || prefix.is_empty() {
        return None;
    }
    let rest = content.strip_prefix(prefix)?;
    let (keyword, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));

    let Ok(kind) = keyword.parse::<CommandKind>() else {
        return Some(Err(UnknownCommand {
            keyword: keyword.to_string(),
            prefix: prefix.to_string(),
        }));
    };

    let mut tokens = args.split_whitespace();
    let intent = match kind {
        CommandKind::Draft => {
            let Some(position) = tokens.next() else {
                return Some(Err(MalformedArgument(format!(
                    "Draft needs a player number, e.g. `{}draft 2`",
                    prefix
                ))));
            };
            let Ok(position) = position.parse::<i64>() else {
                return Some(Err(MalformedArgument(
                    "Not a number, users must be given as a number".to_string(),
                )));
            };
            Intent::Draft {
                position,
                name: tokens.collect(),
            }
        }
        CommandKind::New => Intent::New {
            name: tokens.collect(),
        },
        CommandKind::Join => Intent::Join {
            name: tokens.collect(),
        },
        CommandKind::Leave => Intent::Leave {
            name: tokens.collect(),
        },
        CommandKind::Captain => Intent::Captain {
            name: tokens.collect(),
        },
        CommandKind::Start => Intent::Start {
            name: tokens.collect(),
        },
        CommandKind::Status => Intent::Status {
            name: tokens.collect(),
        },
        CommandKind::Finish => Intent::Finish {
            name: tokens.collect(),
        },
        CommandKind::Uncaptain => Intent::Uncaptain,
        CommandKind::Kick => Intent::Kick,
        CommandKind::Help => Intent::Help,
    };

    Some(Ok(intent))
}

/// The command listing sent in reply to `help`.
pub fn help_text(prefix: &str) -> String {
    let lines: Vec<String> = CommandKind::iter()
        .map(|kind| {
            let (args, description) = kind.usage();
            let synopsis = format!("{}{} {}", prefix, kind, args);
            format!("`{}` {}", synopsis.trim_end(), description)
        })
        .collect();
    format!("__Commands__\n{}", lines.join("\n"))
}
