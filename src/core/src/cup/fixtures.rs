use crate::cup::{Cup, CupRound};
use crate::error::{ScheduleError, ScheduleResult};
use crate::season::{DateAllocator, Season, SeasonEventType};
use crate::shared::{CompetitionType, Fixture};
use chrono::{Duration, NaiveDate};
use itertools::Itertools;
use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const CUP_FALLBACK_INTERVAL_DAYS: i64 = 7;

/// Cups generated and advanced together. The batch shares one calendar
/// date per round number, and holds the global knowledge the
/// preliminary-round deferral rule needs: when any member cup requires a
/// preliminary round, no cup draws its first proper round until every
/// preliminary round in the batch has resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CupBatch {
    pub cups: Vec<Cup>,
    round_dates: BTreeMap<u8, NaiveDate>,
}

impl CupBatch {
    pub fn new(cups: Vec<Cup>) -> Self {
        CupBatch {
            cups,
            round_dates: BTreeMap::new(),
        }
    }

    pub fn cup(&self, cup_id: u32) -> Option<&Cup> {
        self.cups.iter().find(|cup| cup.id == cup_id)
    }

    pub fn any_preliminary(&self) -> bool {
        self.cups.iter().any(Cup::needs_preliminary_round)
    }

    /// Proper rounds start at 2 when the batch plays preliminaries, so
    /// round numbering stays aligned across cups sharing dates.
    pub fn first_proper_round(&self) -> u8 {
        if self.any_preliminary() { 2 } else { 1 }
    }

    fn preliminary_rounds_resolved(&self) -> bool {
        self.cups
            .iter()
            .filter(|cup| cup.needs_preliminary_round())
            .all(|cup| {
                cup.rounds
                    .first()
                    .is_some_and(|round| round.preliminary && round.is_complete())
            })
    }
}

/// Outcome of one advancement call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CupAdvance {
    Fixtures(Vec<Fixture>),
    Champion(u32),
    /// First proper round withheld while another cup's preliminary round
    /// is still being played.
    Deferred,
}

/// Single-elimination bracket generation and round advancement.
pub struct CupFixtureGenerator;

impl CupFixtureGenerator {
    /// Draws the opening round of every cup in the batch. Cups that need
    /// a preliminary round get one; the rest wait for the batch if any
    /// preliminary exists, otherwise everyone starts at round 1.
    pub fn generate(
        season: &mut Season,
        batch: &mut CupBatch,
        rng: &mut impl Rng,
    ) -> ScheduleResult<Vec<Fixture>> {
        for cup in &batch.cups {
            if cup.team_count() < 2 {
                return Err(ScheduleError::NotEnoughTeams {
                    required: 2,
                    found: cup.team_count(),
                });
            }
        }

        let date = DateAllocator::allocate(
            &mut season.events,
            SeasonEventType::CupMatch,
            1,
            CUP_FALLBACK_INTERVAL_DAYS,
        )?[0];
        batch.round_dates.insert(1, date);

        let deferral = batch.any_preliminary();
        let mut fixtures = Vec::new();

        for cup in &mut batch.cups {
            if deferral && !cup.needs_preliminary_round() {
                debug!("cup {} waits for preliminary rounds in the batch", cup.name);
                continue;
            }

            let drawn = if cup.needs_preliminary_round() {
                Self::draw_preliminary_round(cup, date, rng)
            } else {
                Self::draw_round(cup, 1, date, rng)
            };
            fixtures.extend(drawn);
        }

        info!(
            "🏆 cup batch: drew {} opening fixtures across {} cups",
            fixtures.len(),
            batch.cups.len()
        );

        Ok(fixtures)
    }

    /// Advances one cup to its next round. The current round must be
    /// fully decided; its losers are flagged eliminated. A single
    /// remaining team is champion. The first proper round is deferred
    /// until every preliminary round in the batch has resolved.
    pub fn advance_round(
        season: &mut Season,
        batch: &mut CupBatch,
        cup_id: u32,
        rng: &mut impl Rng,
    ) -> ScheduleResult<CupAdvance> {
        let first_proper = batch.first_proper_round();
        let index = batch
            .cups
            .iter()
            .position(|cup| cup.id == cup_id)
            .ok_or(ScheduleError::UnknownCup(cup_id))?;

        // A cup with no rounds yet was deferred at generation time.
        if batch.cups[index].rounds.is_empty() {
            if !batch.preliminary_rounds_resolved() {
                return Ok(CupAdvance::Deferred);
            }
            let date = Self::round_date(season, batch, first_proper)?;
            let fixtures = Self::draw_round(&mut batch.cups[index], first_proper, date, rng);
            return Ok(CupAdvance::Fixtures(fixtures));
        }

        let (current_round, was_preliminary, complete, losers) = {
            let round = batch.cups[index].rounds.last().unwrap();
            (round.round, round.preliminary, round.is_complete(), round.losers())
        };

        if !complete {
            return Err(ScheduleError::RoundNotComplete {
                competition_id: cup_id,
                round: current_round,
            });
        }

        for loser in losers {
            batch.cups[index].eliminated.insert(loser);
        }

        if was_preliminary && !batch.preliminary_rounds_resolved() {
            return Ok(CupAdvance::Deferred);
        }

        let remaining = batch.cups[index].remaining_teams();
        if remaining.len() == 1 {
            let champion_id = remaining[0];
            batch.cups[index].champion_id = Some(champion_id);
            info!("🏆 cup {} champion: team {}", batch.cups[index].name, champion_id);
            return Ok(CupAdvance::Champion(champion_id));
        }

        let next_round = if was_preliminary {
            first_proper
        } else {
            current_round + 1
        };

        let date = Self::round_date(season, batch, next_round)?;
        let fixtures = Self::draw_round(&mut batch.cups[index], next_round, date, rng);
        Ok(CupAdvance::Fixtures(fixtures))
    }

    fn draw_preliminary_round(cup: &mut Cup, date: NaiveDate, rng: &mut impl Rng) -> Vec<Fixture> {
        let mut pool = cup.entrants.clone();
        pool.shuffle(rng);

        // 2×(n − p) teams play their way into the power-of-two bracket,
        // the rest skip straight to the first proper round.
        let playing = cup.preliminary_match_count() * 2;
        let fixtures: Vec<Fixture> = pool[..playing]
            .iter()
            .tuples()
            .map(|(&home, &away)| {
                Fixture::scheduled(CompetitionType::Cup, cup.id, home, away, 1, 1, date)
            })
            .collect();

        cup.rounds.push(CupRound::new(
            1,
            String::from("Preliminary Round"),
            true,
            fixtures.clone(),
        ));
        fixtures
    }

    fn draw_round(cup: &mut Cup, round: u8, date: NaiveDate, rng: &mut impl Rng) -> Vec<Fixture> {
        let mut field = cup.remaining_teams();
        field.shuffle(rng);

        let fixtures: Vec<Fixture> = field
            .iter()
            .tuples()
            .map(|(&home, &away)| {
                Fixture::scheduled(CompetitionType::Cup, cup.id, home, away, round, 1, date)
            })
            .collect();

        cup.rounds.push(CupRound::new(
            round,
            Cup::round_name(field.len()),
            false,
            fixtures.clone(),
        ));
        fixtures
    }

    /// One shared date per round number across the batch. A new round
    /// date comes from the first unoccupied cup day after the previous
    /// round; when the calendar has none left the date is synthesized a
    /// week on, so an in-flight cup always finishes.
    fn round_date(
        season: &mut Season,
        batch: &mut CupBatch,
        round: u8,
    ) -> ScheduleResult<NaiveDate> {
        if let Some(&date) = batch.round_dates.get(&round) {
            return Ok(date);
        }

        let cutoff = batch.round_dates.values().max().copied();
        let date = match DateAllocator::allocate_after(
            &mut season.events,
            SeasonEventType::CupMatch,
            1,
            CUP_FALLBACK_INTERVAL_DAYS,
            cutoff,
        ) {
            Ok(dates) => dates[0],
            Err(ScheduleError::NoAvailableDates(_)) if cutoff.is_some() => {
                cutoff.unwrap() + Duration::days(CUP_FALLBACK_INTERVAL_DAYS)
            }
            Err(error) => return Err(error),
        };

        batch.round_dates.insert(round, date);
        Ok(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn season() -> Season {
        Season::new(1, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn cup_with(id: u32, team_count: u32) -> Cup {
        let first = id * 100;
        Cup::new(
            id,
            format!("Cup {}", id),
            1,
            (first..first + team_count).collect(),
        )
    }

    fn play_out_round(cup: &mut Cup) {
        let round = cup.rounds.last_mut().unwrap();
        for fixture in &mut round.fixtures {
            fixture.winner_team_id = Some(fixture.home_team_id);
        }
    }

    #[test]
    fn power_of_two_field_skips_the_preliminary_round() {
        let mut season = season();
        let mut batch = CupBatch::new(vec![cup_with(1, 8)]);

        let fixtures =
            CupFixtureGenerator::generate(&mut season, &mut batch, &mut rng()).unwrap();

        assert_eq!(fixtures.len(), 4);
        let cup = batch.cup(1).unwrap();
        assert_eq!(cup.rounds.len(), 1);
        assert!(!cup.rounds[0].preliminary);
        assert_eq!(cup.rounds[0].name, "Quarter-final");
    }

    #[test]
    fn ten_teams_play_two_preliminary_matches() {
        let mut season = season();
        let mut batch = CupBatch::new(vec![cup_with(1, 10)]);

        let fixtures =
            CupFixtureGenerator::generate(&mut season, &mut batch, &mut rng()).unwrap();

        assert_eq!(fixtures.len(), 2);
        let cup = batch.cup(1).unwrap();
        assert!(cup.rounds[0].preliminary);
        assert_eq!(cup.rounds[0].name, "Preliminary Round");
    }

    #[test]
    fn five_teams_play_one_preliminary_match() {
        let mut season = season();
        let mut batch = CupBatch::new(vec![cup_with(1, 5)]);

        let fixtures =
            CupFixtureGenerator::generate(&mut season, &mut batch, &mut rng()).unwrap();

        assert_eq!(fixtures.len(), 1);
    }

    #[test]
    fn preliminary_round_leaves_a_power_of_two_field() {
        let mut season = season();
        let mut rng = rng();
        let mut batch = CupBatch::new(vec![cup_with(1, 10)]);

        CupFixtureGenerator::generate(&mut season, &mut batch, &mut rng).unwrap();
        play_out_round(&mut batch.cups[0]);

        let advance =
            CupFixtureGenerator::advance_round(&mut season, &mut batch, 1, &mut rng).unwrap();

        let CupAdvance::Fixtures(fixtures) = advance else {
            panic!("expected fixtures, got {:?}", advance);
        };
        assert_eq!(fixtures.len(), 4);
        assert_eq!(batch.cup(1).unwrap().remaining_teams().len(), 8);
    }

    #[test]
    fn undecided_fixture_blocks_advancement() {
        let mut season = season();
        let mut rng = rng();
        let mut batch = CupBatch::new(vec![cup_with(1, 8)]);

        CupFixtureGenerator::generate(&mut season, &mut batch, &mut rng).unwrap();
        // Decide every fixture except the first.
        {
            let round = batch.cups[0].rounds.last_mut().unwrap();
            for fixture in round.fixtures.iter_mut().skip(1) {
                fixture.winner_team_id = Some(fixture.away_team_id);
            }
        }

        let result = CupFixtureGenerator::advance_round(&mut season, &mut batch, 1, &mut rng);

        assert_eq!(
            result,
            Err(ScheduleError::RoundNotComplete {
                competition_id: 1,
                round: 1
            })
        );
    }

    #[test]
    fn bracket_halves_until_a_champion_emerges() {
        let mut season = season();
        let mut rng = rng();
        let mut batch = CupBatch::new(vec![cup_with(1, 8)]);

        CupFixtureGenerator::generate(&mut season, &mut batch, &mut rng).unwrap();

        let mut field_sizes = vec![8];
        loop {
            play_out_round(&mut batch.cups[0]);
            match CupFixtureGenerator::advance_round(&mut season, &mut batch, 1, &mut rng)
                .unwrap()
            {
                CupAdvance::Fixtures(fixtures) => field_sizes.push(fixtures.len() * 2),
                CupAdvance::Champion(champion_id) => {
                    assert_eq!(batch.cup(1).unwrap().champion_id, Some(champion_id));
                    break;
                }
                CupAdvance::Deferred => panic!("single-cup batch cannot defer"),
            }
        }

        assert_eq!(field_sizes, vec![8, 4, 2]);
        assert_eq!(batch.cup(1).unwrap().rounds.len(), 3);
    }

    #[test]
    fn batches_with_a_preliminary_defer_every_first_proper_round() {
        let mut season = season();
        let mut rng = rng();
        // Cup 1 needs a preliminary round, cup 2 does not.
        let mut batch = CupBatch::new(vec![cup_with(1, 10), cup_with(2, 8)]);

        let fixtures =
            CupFixtureGenerator::generate(&mut season, &mut batch, &mut rng).unwrap();

        // Only the preliminary matches were drawn.
        assert_eq!(fixtures.len(), 2);
        assert!(batch.cup(2).unwrap().rounds.is_empty());

        // Cup 2 cannot start while cup 1's preliminary is unresolved.
        let advance =
            CupFixtureGenerator::advance_round(&mut season, &mut batch, 2, &mut rng).unwrap();
        assert_eq!(advance, CupAdvance::Deferred);

        play_out_round(&mut batch.cups[0]);

        // Once the preliminary resolves, both cups open at round 2.
        let cup_two =
            CupFixtureGenerator::advance_round(&mut season, &mut batch, 2, &mut rng).unwrap();
        let CupAdvance::Fixtures(cup_two_fixtures) = cup_two else {
            panic!("cup 2 should draw its opening round");
        };
        assert_eq!(cup_two_fixtures.len(), 4);
        assert!(cup_two_fixtures.iter().all(|f| f.round == 2));

        let cup_one =
            CupFixtureGenerator::advance_round(&mut season, &mut batch, 1, &mut rng).unwrap();
        let CupAdvance::Fixtures(cup_one_fixtures) = cup_one else {
            panic!("cup 1 should draw its first proper round");
        };
        assert_eq!(cup_one_fixtures.len(), 4);
        assert!(cup_one_fixtures.iter().all(|f| f.round == 2));

        // Both cups share the round-2 date.
        assert_eq!(cup_one_fixtures[0].date, cup_two_fixtures[0].date);
    }

    #[test]
    fn losers_are_flagged_eliminated() {
        let mut season = season();
        let mut rng = rng();
        let mut batch = CupBatch::new(vec![cup_with(1, 8)]);

        CupFixtureGenerator::generate(&mut season, &mut batch, &mut rng).unwrap();
        let losers: HashSet<u32> = batch.cups[0].rounds[0]
            .fixtures
            .iter()
            .map(|f| f.away_team_id)
            .collect();
        play_out_round(&mut batch.cups[0]);

        CupFixtureGenerator::advance_round(&mut season, &mut batch, 1, &mut rng).unwrap();

        assert_eq!(batch.cup(1).unwrap().eliminated, losers);
    }

    #[test]
    fn empty_cup_is_rejected_before_any_allocation() {
        let mut season = season();
        let occupied_before = season.occupied_event_count();
        let mut batch = CupBatch::new(vec![cup_with(1, 8), cup_with(2, 1)]);

        let result = CupFixtureGenerator::generate(&mut season, &mut batch, &mut rng());

        assert_eq!(
            result,
            Err(ScheduleError::NotEnoughTeams {
                required: 2,
                found: 1
            })
        );
        assert_eq!(season.occupied_event_count(), occupied_before);
    }
}
