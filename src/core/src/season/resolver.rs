use crate::cup::Cup;
use crate::league::League;
use crate::season::Season;
use crate::shared::{CompetitionType, Standing, sorted_table};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Season-end outcome of one competition, emitted once per
/// (season, competition) pair and committed by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionResult {
    pub season_id: u32,
    pub competition_id: u32,
    pub competition_type: CompetitionType,
    pub champion_id: Option<u32>,
    pub runner_up_id: Option<u32>,
    pub relegated: Vec<u32>,
    pub promoted: Vec<u32>,
    pub continental_qualifiers: Vec<u32>,
}

/// Resolves champions, promotion/relegation and continental
/// qualification from final standings and cup brackets. Idempotent: a
/// competition already resolved for the season yields nothing.
pub struct SeasonResultResolver;

impl SeasonResultResolver {
    /// Resolves every finished competition of the season in one pass.
    /// `standings` maps a league or continental-cup id to its final table.
    pub fn resolve_all(
        season: &mut Season,
        leagues: &[League],
        cups: &[Cup],
        standings: &HashMap<u32, Vec<Standing>>,
    ) -> Vec<CompetitionResult> {
        let mut results = Vec::new();

        for league in leagues {
            let Some(table) = standings.get(&league.id) else {
                continue;
            };

            let lower_tier = Self::tier_below(league, leagues).and_then(|below| {
                standings
                    .get(&below.id)
                    .map(|lower_table| (below, lower_table.as_slice()))
            });

            if let Some(result) = Self::resolve_league(season, league, table, lower_tier) {
                results.push(result);
            }
        }

        for cup in cups {
            if let Some(result) = Self::resolve_cup(season, cup) {
                results.push(result);
            }
        }

        info!(
            "🏁 season {}: resolved {} competitions",
            season.id,
            results.len()
        );

        results
    }

    /// Champion and runner-up from the final table; the bottom
    /// `relegation_spots` relegate only when a lower tier exists, and the
    /// promoted teams come from that lower tier's own standings. Top-tier
    /// leagues send their top three into continental competition.
    pub fn resolve_league(
        season: &mut Season,
        league: &League,
        standings: &[Standing],
        lower_tier: Option<(&League, &[Standing])>,
    ) -> Option<CompetitionResult> {
        if season.is_resolved(CompetitionType::League, league.id) {
            debug!("league {} already resolved this season", league.name);
            return None;
        }

        let table = sorted_table(standings);
        let champion_id = table.first().map(|standing| standing.team_id)?;
        let runner_up_id = table.get(1).map(|standing| standing.team_id);

        let relegated: Vec<u32> = match lower_tier {
            Some(_) => table
                .iter()
                .rev()
                .take(league.relegation_spots as usize)
                .map(|standing| standing.team_id)
                .collect(),
            None => Vec::new(),
        };

        let promoted: Vec<u32> = match lower_tier {
            Some((below, lower_standings)) => sorted_table(lower_standings)
                .iter()
                .take(below.promotion_spots as usize)
                .map(|standing| standing.team_id)
                .collect(),
            None => Vec::new(),
        };

        let continental_qualifiers: Vec<u32> = if league.is_top_tier() {
            table
                .iter()
                .take(3)
                .map(|standing| standing.team_id)
                .collect()
        } else {
            Vec::new()
        };

        season.mark_resolved(CompetitionType::League, league.id);

        Some(CompetitionResult {
            season_id: season.id,
            competition_id: league.id,
            competition_type: CompetitionType::League,
            champion_id: Some(champion_id),
            runner_up_id,
            relegated,
            promoted,
            continental_qualifiers,
        })
    }

    /// Champion and runner-up from the final's single fixture; a missing
    /// winner id is derived from the goal count. The champion qualifies
    /// for continental competition.
    pub fn resolve_cup(season: &mut Season, cup: &Cup) -> Option<CompetitionResult> {
        if season.is_resolved(CompetitionType::Cup, cup.id) {
            debug!("cup {} already resolved this season", cup.name);
            return None;
        }

        // A preliminary round can also hold a single fixture, so the
        // fixture count alone does not identify the final.
        let final_round = cup.rounds.last()?;
        if final_round.preliminary || final_round.fixtures.len() != 1 {
            return None;
        }

        let final_fixture = &final_round.fixtures[0];
        let champion_id = final_fixture.winner()?;
        let runner_up_id = if champion_id == final_fixture.home_team_id {
            final_fixture.away_team_id
        } else {
            final_fixture.home_team_id
        };

        season.mark_resolved(CompetitionType::Cup, cup.id);

        Some(CompetitionResult {
            season_id: season.id,
            competition_id: cup.id,
            competition_type: CompetitionType::Cup,
            champion_id: Some(champion_id),
            runner_up_id: Some(runner_up_id),
            relegated: Vec::new(),
            promoted: Vec::new(),
            continental_qualifiers: vec![champion_id],
        })
    }

    fn tier_below<'l>(league: &League, leagues: &'l [League]) -> Option<&'l League> {
        leagues.iter().find(|other| {
            other.country_id == league.country_id && other.tier == league.tier + 1
        })
    }
}
