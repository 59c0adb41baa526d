pub mod continent;
pub mod cup;
pub mod error;
pub mod league;
pub mod season;
pub mod shared;

// Re-export season items
pub use season::{
    CompetitionResult, DateAllocator, Season, SeasonCalendarBuilder, SeasonEvent,
    SeasonEventType, SeasonResultResolver,
};

// Re-export competition items
pub use continent::{
    ContinentalCup, KnockoutGenerator, KnockoutStage, LeaguePhaseGenerator, PhaseTemplate,
    REQUIRED_QUALIFIERS,
};
pub use cup::{Cup, CupAdvance, CupBatch, CupFixtureGenerator, CupRound};
pub use league::{League, LeagueFixtureGenerator};

pub use error::{ScheduleError, ScheduleResult};
pub use shared::{CompetitionType, Fixture, FixtureStatus, Standing};
