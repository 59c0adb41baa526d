use crate::continent::{ContinentalCup, KnockoutStage};
use crate::error::{ScheduleError, ScheduleResult};
use crate::season::{DateAllocator, Season, SeasonEventType};
use crate::shared::{CompetitionType, Fixture, Standing};
use chrono::{Duration, NaiveDate};
use itertools::Itertools;
use log::info;
use rand::Rng;
use rand::seq::SliceRandom;

/// The knockout draw takes exactly the top 16 of the league phase.
pub const REQUIRED_QUALIFIERS: usize = 16;

const LEG_INTERVAL_DAYS: i64 = 7;
const CONTINENTAL_FALLBACK_INTERVAL_DAYS: i64 = 14;

/// Knockout stage of a continental cup. The first knockout template is
/// seeded from the final league-phase standings; every later template
/// pairs the winners of the one before it. Two-legged templates emit a
/// home and a return fixture about a week apart.
pub struct KnockoutGenerator;

impl KnockoutGenerator {
    pub fn generate(
        season: &mut Season,
        cup: &mut ContinentalCup,
        phase_template_id: u32,
        standings: &[Standing],
        rng: &mut impl Rng,
    ) -> ScheduleResult<Vec<Fixture>> {
        let template = cup
            .phase(phase_template_id)
            .ok_or(ScheduleError::UnknownPhase {
                competition_id: cup.id,
                template_id: phase_template_id,
            })?
            .clone();

        if !template.is_knockout {
            return Err(ScheduleError::NotKnockout(phase_template_id));
        }

        let mut entrants = if cup.knockout_stages.is_empty() {
            Self::seed_from_standings(standings)?
        } else {
            Self::winners_of_last_stage(cup)?
        };
        entrants.shuffle(rng);

        let round = cup.league_phase_matches + cup.knockout_stages.len() as u8 + 1;
        let cutoff = Self::stage_cutoff(cup);
        let first_leg_date = DateAllocator::allocate_after(
            &mut season.events,
            SeasonEventType::ContinentalMatch,
            1,
            CONTINENTAL_FALLBACK_INTERVAL_DAYS,
            cutoff,
        )?[0];

        let mut fixtures: Vec<Fixture> = entrants
            .iter()
            .tuples()
            .map(|(&home, &away)| {
                Fixture::scheduled(
                    CompetitionType::ContinentalCup,
                    cup.id,
                    home,
                    away,
                    round,
                    1,
                    first_leg_date,
                )
            })
            .collect();

        if template.is_two_legged {
            let return_leg_date =
                Self::return_leg_date(season, first_leg_date)?;
            let return_legs: Vec<Fixture> = fixtures
                .iter()
                .map(|first_leg| {
                    Fixture::scheduled(
                        CompetitionType::ContinentalCup,
                        cup.id,
                        first_leg.away_team_id,
                        first_leg.home_team_id,
                        round,
                        2,
                        return_leg_date,
                    )
                })
                .collect();
            fixtures.extend(return_legs);
        }

        info!(
            "🌍 {}: {} drawn with {} ties{}",
            cup.name,
            template.name,
            entrants.len() / 2,
            if template.is_two_legged { " over two legs" } else { "" }
        );

        cup.knockout_stages.push(KnockoutStage {
            template_id: phase_template_id,
            fixtures: fixtures.clone(),
        });

        Ok(fixtures)
    }

    /// Top 16 of the final league-phase table, by ranking. Any other
    /// qualifier count is a precondition failure.
    fn seed_from_standings(standings: &[Standing]) -> ScheduleResult<Vec<u32>> {
        let mut table = standings.to_vec();
        table.sort_by_key(|standing| standing.ranking);

        let qualifiers: Vec<u32> = table
            .iter()
            .take(REQUIRED_QUALIFIERS)
            .map(|standing| standing.team_id)
            .collect();

        if qualifiers.len() != REQUIRED_QUALIFIERS {
            return Err(ScheduleError::InvalidQualifierCount(qualifiers.len()));
        }

        Ok(qualifiers)
    }

    /// Winners of the previous knockout stage, in tie order. Every tie
    /// must be decided: two-legged ties on aggregate goals, falling back
    /// to the return leg's recorded winner when the aggregate is level.
    fn winners_of_last_stage(cup: &ContinentalCup) -> ScheduleResult<Vec<u32>> {
        let stage = cup.knockout_stages.last().unwrap();
        let round = stage
            .fixtures
            .first()
            .map(|fixture| fixture.round)
            .unwrap_or(0);

        let mut winners = Vec::new();

        for first_leg in stage.fixtures.iter().filter(|f| f.leg == 1) {
            let return_leg = stage.fixtures.iter().find(|f| {
                f.leg == 2
                    && f.home_team_id == first_leg.away_team_id
                    && f.away_team_id == first_leg.home_team_id
            });

            let winner = match return_leg {
                Some(second_leg) => Self::tie_winner(first_leg, second_leg),
                None => first_leg.winner(),
            };

            match winner {
                Some(team_id) => winners.push(team_id),
                None => {
                    return Err(ScheduleError::RoundNotComplete {
                        competition_id: cup.id,
                        round,
                    });
                }
            }
        }

        Ok(winners)
    }

    fn tie_winner(first_leg: &Fixture, second_leg: &Fixture) -> Option<u32> {
        let aggregate = (
            first_leg.home_goals,
            first_leg.away_goals,
            second_leg.home_goals,
            second_leg.away_goals,
        );

        if let (Some(a_home), Some(b_away), Some(b_home), Some(a_away)) = aggregate {
            let first_team_total = a_home as u16 + a_away as u16;
            let second_team_total = b_away as u16 + b_home as u16;

            if first_team_total > second_team_total {
                return Some(first_leg.home_team_id);
            }
            if second_team_total > first_team_total {
                return Some(first_leg.away_team_id);
            }
        }

        second_leg.winner()
    }

    fn stage_cutoff(cup: &ContinentalCup) -> Option<NaiveDate> {
        cup.knockout_stages
            .last()
            .and_then(|stage| stage.fixtures.iter().map(|f| f.date).max())
            .or(cup.league_phase_end)
    }

    /// Return legs land on the next continental date, roughly a week on;
    /// past the calendar's end the date is synthesized directly.
    fn return_leg_date(season: &mut Season, first_leg_date: NaiveDate) -> ScheduleResult<NaiveDate> {
        match DateAllocator::allocate_after(
            &mut season.events,
            SeasonEventType::ContinentalMatch,
            1,
            CONTINENTAL_FALLBACK_INTERVAL_DAYS,
            Some(first_leg_date),
        ) {
            Ok(dates) => Ok(dates[0]),
            Err(ScheduleError::NoAvailableDates(_)) => {
                Ok(first_leg_date + Duration::days(LEG_INTERVAL_DAYS))
            }
            Err(error) => Err(error),
        }
    }
}
