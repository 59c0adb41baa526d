use crate::continent::ContinentalCup;
use crate::error::{ScheduleError, ScheduleResult};
use crate::season::{DateAllocator, Season, SeasonEventType};
use crate::shared::{CompetitionType, Fixture};
use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet};

/// Randomized perfect-matching attempts per round before the greedy
/// fallback takes over. Bounds worst-case latency; exhaustion is
/// recovered locally and never surfaces as an error.
const PAIRING_ATTEMPTS: usize = 2000;

const CONTINENTAL_FALLBACK_INTERVAL_DAYS: i64 = 14;

/// League phase of a continental cup: every team plays a fixed number of
/// rounds against distinct opponents, far fewer than a full round robin.
/// Pairings are found by randomized search with repeat rejection; home
/// advantage goes to whichever side has hosted less.
pub struct LeaguePhaseGenerator;

impl LeaguePhaseGenerator {
    pub fn generate(
        season: &mut Season,
        cup: &mut ContinentalCup,
        teams: &[u32],
        rng: &mut impl Rng,
    ) -> ScheduleResult<Vec<Fixture>> {
        if teams.len() < 2 {
            return Err(ScheduleError::NotEnoughTeams {
                required: 2,
                found: teams.len(),
            });
        }

        if teams.len() % 2 != 0 {
            return Err(ScheduleError::OddTeamCount(teams.len()));
        }

        let rounds = cup.league_phase_matches as usize;
        let dates = DateAllocator::allocate(
            &mut season.events,
            SeasonEventType::ContinentalMatch,
            rounds,
            CONTINENTAL_FALLBACK_INTERVAL_DAYS,
        )?;

        let mut played: HashSet<(u32, u32)> = HashSet::new();
        let mut home_counts: HashMap<u32, u32> =
            teams.iter().map(|&team_id| (team_id, 0)).collect();
        let mut fixtures = Vec::with_capacity(rounds * teams.len() / 2);

        for round in 0..rounds {
            for (first, second) in Self::pair_round(teams, &played, rng) {
                played.insert(pair_key(first, second));

                let (home_team_id, away_team_id) =
                    Self::assign_home(first, second, &home_counts, rng);
                *home_counts.get_mut(&home_team_id).unwrap() += 1;

                fixtures.push(Fixture::scheduled(
                    CompetitionType::ContinentalCup,
                    cup.id,
                    home_team_id,
                    away_team_id,
                    (round + 1) as u8,
                    1,
                    dates[round],
                ));
            }
        }

        cup.league_phase_end = dates.last().copied();

        info!(
            "🌍 {}: league phase of {} rounds, {} fixtures for {} teams",
            cup.name,
            rounds,
            fixtures.len(),
            teams.len()
        );

        Ok(fixtures)
    }

    /// One round's pairing: randomized perfect matchings first, greedy
    /// repair once the attempt limit is hit.
    fn pair_round(
        teams: &[u32],
        played: &HashSet<(u32, u32)>,
        rng: &mut impl Rng,
    ) -> Vec<(u32, u32)> {
        let mut pool = teams.to_vec();

        for _ in 0..PAIRING_ATTEMPTS {
            pool.shuffle(rng);

            let clean = pool
                .chunks(2)
                .all(|pair| !played.contains(&pair_key(pair[0], pair[1])));
            if clean {
                return pool.chunks(2).map(|pair| (pair[0], pair[1])).collect();
            }
        }

        debug!("pairing search exhausted after {PAIRING_ATTEMPTS} attempts, pairing greedily");
        Self::greedy_pairs(&pool, played)
    }

    /// Pairs each team with the first still-unpaired opponent it has not
    /// faced, or with any unpaired opponent when none remain. The repeat
    /// is accepted only as a last resort.
    fn greedy_pairs(teams: &[u32], played: &HashSet<(u32, u32)>) -> Vec<(u32, u32)> {
        let mut remaining = teams.to_vec();
        let mut pairs = Vec::with_capacity(teams.len() / 2);

        while remaining.len() >= 2 {
            let first = remaining.remove(0);
            let partner_index = remaining
                .iter()
                .position(|&other| !played.contains(&pair_key(first, other)))
                .unwrap_or(0);
            let second = remaining.remove(partner_index);
            pairs.push((first, second));
        }

        pairs
    }

    fn assign_home(
        first: u32,
        second: u32,
        home_counts: &HashMap<u32, u32>,
        rng: &mut impl Rng,
    ) -> (u32, u32) {
        match home_counts[&first].cmp(&home_counts[&second]) {
            std::cmp::Ordering::Less => (first, second),
            std::cmp::Ordering::Greater => (second, first),
            std::cmp::Ordering::Equal => {
                if rng.random_bool(0.5) {
                    (first, second)
                } else {
                    (second, first)
                }
            }
        }
    }
}

fn pair_key(first: u32, second: u32) -> (u32, u32) {
    (first.min(second), first.max(second))
}
