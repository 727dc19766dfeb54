//! Error types for the scoring and settlement engine.

use std::fmt;

use thiserror::Error;

use crate::roster::MemberId;
use crate::scoring::GameMode;

/// Result type for engine operations.
pub type DokoResult<T> = Result<T, DokoError>;

/// Errors that can occur while managing the club and its evenings.
#[derive(Debug, Error)]
pub enum DokoError {
    /// An evening needs exactly 4 or 5 participants.
    #[error("an evening needs 4 or 5 participants, got {0}")]
    InvalidParticipantCount(usize),

    /// The same member was listed twice as a participant.
    #[error("member {0} is listed more than once")]
    DuplicateParticipant(MemberId),

    /// The designated host does not take part in the evening.
    #[error("host {0} must also be a participant")]
    InvalidHost(MemberId),

    /// A member id that is not on the roster.
    #[error("unknown member: {0}")]
    UnknownMember(MemberId),

    /// A member name that matches nobody on the roster or at the table.
    #[error("unknown player: \"{0}\"")]
    UnknownPlayerName(String),

    /// The member exists but does not sit at this evening's table.
    #[error("member {0} does not take part in this evening")]
    PlayerNotInEvening(MemberId),

    /// A member name was empty after trimming.
    #[error("member name must not be empty")]
    EmptyName,

    /// The member still appears in a recorded evening.
    #[error("member {0} is referenced by a recorded evening")]
    MemberReferenced(MemberId),

    /// No evening with the given id.
    #[error("evening not found: {0}")]
    EveningNotFound(i64),

    /// The round was rejected; nothing was recorded.
    #[error("invalid round: {0}")]
    InvalidRound(RoundRejection),

    /// A stored evening breaks the shape every evening must keep.
    #[error("evening {0} is corrupt: {1}")]
    CorruptEvening(i64, String),

    /// The evening is closed and its settlement is fixed.
    #[error("the evening is already finished")]
    AlreadyFinished,

    /// A settings value is out of range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Unknown console command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Malformed console input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Snapshot (de)serialization failed.
    #[error("snapshot error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The specific constraint a rejected round violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundRejection {
    /// Wrong number of winners for the selected mode.
    WinnerCount {
        /// Mode the round was entered in.
        mode: GameMode,
        /// Number of winners that were selected.
        selected: usize,
    },
    /// Points were zero, negative, missing, or not a number.
    NonPositivePoints,
    /// A selected winner is the sitting-out dealer or not at the table.
    WinnerNotActive(MemberId),
    /// A winner was selected twice.
    DuplicateWinner(MemberId),
}

impl fmt::Display for RoundRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WinnerCount { mode, selected } => {
                write!(
                    f,
                    "{mode} round needs {} winners, got {selected}",
                    mode.winner_rule()
                )
            }
            Self::NonPositivePoints => write!(f, "points must be a positive whole number"),
            Self::WinnerNotActive(id) => write!(f, "member {id} is not playing this round"),
            Self::DuplicateWinner(id) => write!(f, "member {id} selected twice"),
        }
    }
}

impl From<RoundRejection> for DokoError {
    fn from(reason: RoundRejection) -> Self {
        Self::InvalidRound(reason)
    }
}
