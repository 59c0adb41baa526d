use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One team's accumulated record in a league or continental league phase.
/// Maintained by the match-result processing layer; the scheduler only
/// reads it for knockout seeding and season-end resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standing {
    pub team_id: u32,
    pub played: u8,
    pub wins: u8,
    pub draws: u8,
    pub losses: u8,
    pub goals_for: u16,
    pub goals_against: u16,
    pub points: u16,
    pub ranking: u8,
}

impl Standing {
    pub fn new(team_id: u32) -> Self {
        Standing {
            team_id,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            points: 0,
            ranking: 0,
        }
    }

    pub fn goal_difference(&self) -> i32 {
        self.goals_for as i32 - self.goals_against as i32
    }

    /// Classification order: points, then goal difference, then goals scored.
    pub fn compare(&self, other: &Standing) -> Ordering {
        other
            .points
            .cmp(&self.points)
            .then(other.goal_difference().cmp(&self.goal_difference()))
            .then(other.goals_for.cmp(&self.goals_for))
    }
}

/// Returns the table sorted into final classification order.
pub fn sorted_table(standings: &[Standing]) -> Vec<Standing> {
    let mut table = standings.to_vec();
    table.sort_by(|a, b| a.compare(b));
    table
}
