use crate::season::SeasonEventType;
use thiserror::Error;

/// Fatal scheduling failures. Every generation call is all-or-nothing:
/// when one of these is returned, no calendar occupancy or competition
/// state has been mutated by that call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("not enough teams: need at least {required}, got {found}")]
    NotEnoughTeams { required: usize, found: usize },

    #[error("cannot pair an odd number of teams ({0}) in a league phase")]
    OddTeamCount(usize),

    #[error("no unoccupied {0:?} dates left in the season calendar")]
    NoAvailableDates(SeasonEventType),

    #[error("knockout seeding requires exactly 16 qualifiers, got {0}")]
    InvalidQualifierCount(usize),

    #[error("round {round} of competition {competition_id} still has undecided fixtures")]
    RoundNotComplete { competition_id: u32, round: u8 },

    #[error("competition {competition_id} has no phase template {template_id}")]
    UnknownPhase { competition_id: u32, template_id: u32 },

    #[error("phase template {0} is not a knockout phase")]
    NotKnockout(u32),

    #[error("cup {0} is not part of this batch")]
    UnknownCup(u32),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
