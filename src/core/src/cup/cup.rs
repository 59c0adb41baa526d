use crate::shared::Fixture;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Single-elimination national cup. The round count is derived from the
/// entrant count: `ceil(log2(n))`, with a preliminary round inserted iff
/// `n` is not a power of two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cup {
    pub id: u32,
    pub name: String,
    pub country_id: u32,
    pub entrants: Vec<u32>,
    pub rounds: Vec<CupRound>,
    pub eliminated: HashSet<u32>,
    pub champion_id: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CupRound {
    pub round: u8,
    pub name: String,
    pub preliminary: bool,
    pub fixtures: Vec<Fixture>,
}

impl Cup {
    pub fn new(id: u32, name: String, country_id: u32, entrants: Vec<u32>) -> Self {
        Cup {
            id,
            name,
            country_id,
            entrants,
            rounds: Vec::new(),
            eliminated: HashSet::new(),
            champion_id: None,
        }
    }

    pub fn team_count(&self) -> usize {
        self.entrants.len()
    }

    /// `ceil(log2(n))`: 8 entrants play 3 rounds, 10 play 4, 5 play 3.
    pub fn total_rounds(&self) -> u8 {
        let mut rounds = 0;
        let mut bracket = 1;
        while bracket < self.team_count() {
            bracket *= 2;
            rounds += 1;
        }
        rounds
    }

    pub fn needs_preliminary_round(&self) -> bool {
        !self.team_count().is_power_of_two()
    }

    /// Matches in the preliminary round: `n − largest_power_of_two ≤ n`.
    /// After those resolve the surviving field is exactly a power of two.
    pub fn preliminary_match_count(&self) -> usize {
        self.team_count() - largest_power_of_two(self.team_count())
    }

    /// Entrants still in the competition, in entry order.
    pub fn remaining_teams(&self) -> Vec<u32> {
        self.entrants
            .iter()
            .copied()
            .filter(|team_id| !self.eliminated.contains(team_id))
            .collect()
    }

    pub fn round_name(field_size: usize) -> String {
        match field_size {
            2 => String::from("Final"),
            4 => String::from("Semi-final"),
            8 => String::from("Quarter-final"),
            _ => format!("Round of {}", field_size),
        }
    }
}

impl CupRound {
    pub fn new(round: u8, name: String, preliminary: bool, fixtures: Vec<Fixture>) -> Self {
        CupRound {
            round,
            name,
            preliminary,
            fixtures,
        }
    }

    /// A round is complete only when every fixture has a decided winner.
    pub fn is_complete(&self) -> bool {
        self.fixtures.iter().all(|fixture| fixture.winner().is_some())
    }

    pub fn winners(&self) -> Vec<u32> {
        self.fixtures.iter().filter_map(Fixture::winner).collect()
    }

    pub fn losers(&self) -> Vec<u32> {
        self.fixtures.iter().filter_map(Fixture::loser).collect()
    }
}

pub fn largest_power_of_two(n: usize) -> usize {
    debug_assert!(n > 0);
    1 << (usize::BITS - 1 - n.leading_zeros())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cup_with(team_count: u32) -> Cup {
        Cup::new(1, String::from("National Cup"), 1, (1..=team_count).collect())
    }

    #[test]
    fn round_count_is_ceil_log2() {
        assert_eq!(cup_with(2).total_rounds(), 1);
        assert_eq!(cup_with(5).total_rounds(), 3);
        assert_eq!(cup_with(8).total_rounds(), 3);
        assert_eq!(cup_with(10).total_rounds(), 4);
        assert_eq!(cup_with(64).total_rounds(), 6);
    }

    #[test]
    fn preliminary_round_exists_iff_not_power_of_two() {
        assert!(!cup_with(8).needs_preliminary_round());
        assert!(!cup_with(16).needs_preliminary_round());
        assert!(cup_with(5).needs_preliminary_round());
        assert!(cup_with(10).needs_preliminary_round());
    }

    #[test]
    fn preliminary_match_counts() {
        assert_eq!(cup_with(10).preliminary_match_count(), 2);
        assert_eq!(cup_with(5).preliminary_match_count(), 1);
        assert_eq!(cup_with(12).preliminary_match_count(), 4);
    }

    #[test]
    fn largest_power_of_two_below() {
        assert_eq!(largest_power_of_two(5), 4);
        assert_eq!(largest_power_of_two(8), 8);
        assert_eq!(largest_power_of_two(10), 8);
        assert_eq!(largest_power_of_two(1), 1);
    }

    #[test]
    fn late_round_names() {
        assert_eq!(Cup::round_name(16), "Round of 16");
        assert_eq!(Cup::round_name(8), "Quarter-final");
        assert_eq!(Cup::round_name(4), "Semi-final");
        assert_eq!(Cup::round_name(2), "Final");
    }
}
