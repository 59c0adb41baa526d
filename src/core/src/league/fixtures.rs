use crate::error::{ScheduleError, ScheduleResult};
use crate::league::League;
use crate::season::{DateAllocator, Season, SeasonEventType};
use crate::shared::{CompetitionType, Fixture};
use log::info;

/// Synthetic participant padding an odd entrant list to even size.
/// Never appears in any emitted fixture.
const BYE_TEAM_ID: u32 = u32::MAX;

const LEAGUE_FALLBACK_INTERVAL_DAYS: i64 = 7;

/// Round-robin schedule for one division, built with the circle method:
/// the first slot stays fixed while the remaining teams rotate one
/// position per round, covering every unordered pair exactly once per
/// leg. The second leg mirrors the first with home and away swapped.
pub struct LeagueFixtureGenerator;

impl LeagueFixtureGenerator {
    pub fn generate(
        season: &mut Season,
        league: &League,
        teams: &[u32],
    ) -> ScheduleResult<Vec<Fixture>> {
        if teams.len() < 2 {
            return Err(ScheduleError::NotEnoughTeams {
                required: 2,
                found: teams.len(),
            });
        }

        let rounds = Self::round_robin(teams);
        let dates = DateAllocator::allocate(
            &mut season.events,
            SeasonEventType::ChampionshipMatch,
            rounds.len(),
            LEAGUE_FALLBACK_INTERVAL_DAYS,
        )?;

        let rounds_per_leg = rounds.len() / 2;
        let mut fixtures = Vec::new();

        for (round_index, pairings) in rounds.iter().enumerate() {
            let leg = if round_index < rounds_per_leg { 1 } else { 2 };

            for &(home_team_id, away_team_id) in pairings {
                fixtures.push(Fixture::scheduled(
                    CompetitionType::League,
                    league.id,
                    home_team_id,
                    away_team_id,
                    (round_index + 1) as u8,
                    leg,
                    dates[round_index],
                ));
            }
        }

        info!(
            "⚽ {}: scheduled {} fixtures over {} rounds for {} teams",
            league.name,
            fixtures.len(),
            rounds.len(),
            teams.len()
        );

        Ok(fixtures)
    }

    /// Pairings for all `2(n−1)` rounds, bye fixtures already stripped.
    fn round_robin(teams: &[u32]) -> Vec<Vec<(u32, u32)>> {
        let mut rotation: Vec<u32> = teams.to_vec();
        if rotation.len() % 2 != 0 {
            rotation.push(BYE_TEAM_ID);
        }

        let team_count = rotation.len();
        let rounds_per_leg = team_count - 1;
        let mut first_leg: Vec<Vec<(u32, u32)>> = Vec::with_capacity(rounds_per_leg);

        for round in 0..rounds_per_leg {
            let mut pairings = Vec::with_capacity(team_count / 2);

            for slot in 0..team_count / 2 {
                let mut home_team_id = rotation[slot];
                let mut away_team_id = rotation[team_count - 1 - slot];

                // Slot 0 keeps the fixed team; alternate its venue so it
                // does not host every round.
                if slot == 0 && round % 2 == 1 {
                    std::mem::swap(&mut home_team_id, &mut away_team_id);
                }

                if home_team_id == BYE_TEAM_ID || away_team_id == BYE_TEAM_ID {
                    continue;
                }

                pairings.push((home_team_id, away_team_id));
            }

            first_leg.push(pairings);
            rotation[1..].rotate_right(1);
        }

        let second_leg: Vec<Vec<(u32, u32)>> = first_leg
            .iter()
            .map(|pairings| pairings.iter().map(|&(home, away)| (away, home)).collect())
            .collect();

        let mut rounds = first_leg;
        rounds.extend(second_leg);
        rounds
    }
}
