use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Competition family tag. One generator exists per family; callers
/// dispatch on this tag instead of keeping parallel implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompetitionType {
    League,
    Cup,
    ContinentalCup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixtureStatus {
    Scheduled,
    Played,
    Cancelled,
}

/// One scheduled match between two teams within a competition round.
/// The engine emits fixtures in `Scheduled` state; the match simulation
/// layer fills in goals, status and the winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub competition_type: CompetitionType,
    pub competition_id: u32,
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub round: u8,
    pub leg: u8,
    pub date: NaiveDate,
    pub status: FixtureStatus,
    pub home_goals: Option<u8>,
    pub away_goals: Option<u8>,
    pub winner_team_id: Option<u32>,
}

impl Fixture {
    pub fn scheduled(
        competition_type: CompetitionType,
        competition_id: u32,
        home_team_id: u32,
        away_team_id: u32,
        round: u8,
        leg: u8,
        date: NaiveDate,
    ) -> Self {
        Fixture {
            competition_type,
            competition_id,
            home_team_id,
            away_team_id,
            round,
            leg,
            date,
            status: FixtureStatus::Scheduled,
            home_goals: None,
            away_goals: None,
            winner_team_id: None,
        }
    }

    pub fn involves(&self, team_id: u32) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// Decided winner: the explicitly recorded id, or the side with more
    /// goals when only a score was stored. Drawn or unplayed fixtures
    /// have no winner.
    pub fn winner(&self) -> Option<u32> {
        if let Some(winner_id) = self.winner_team_id {
            return Some(winner_id);
        }

        match (self.home_goals, self.away_goals) {
            (Some(home), Some(away)) if home > away => Some(self.home_team_id),
            (Some(home), Some(away)) if away > home => Some(self.away_team_id),
            _ => None,
        }
    }

    pub fn loser(&self) -> Option<u32> {
        self.winner().map(|winner_id| {
            if winner_id == self.home_team_id {
                self.away_team_id
            } else {
                self.home_team_id
            }
        })
    }
}
