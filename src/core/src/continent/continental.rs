use crate::shared::Fixture;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Continental competition: a fixed-round league phase feeding a seeded
/// knockout whose shape is described by ordered phase templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinentalCup {
    pub id: u32,
    pub name: String,
    pub team_count: usize,
    /// Matches each team plays in the league phase (well below n − 1).
    pub league_phase_matches: u8,
    pub phases: Vec<PhaseTemplate>,
    /// Date of the league phase's final round, once scheduled. Knockout
    /// rounds are placed strictly after it.
    pub league_phase_end: Option<NaiveDate>,
    pub knockout_stages: Vec<KnockoutStage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseTemplate {
    pub id: u32,
    pub name: String,
    pub is_knockout: bool,
    pub is_two_legged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnockoutStage {
    pub template_id: u32,
    pub fixtures: Vec<Fixture>,
}

impl ContinentalCup {
    pub fn new(
        id: u32,
        name: String,
        team_count: usize,
        league_phase_matches: u8,
        phases: Vec<PhaseTemplate>,
    ) -> Self {
        ContinentalCup {
            id,
            name,
            team_count,
            league_phase_matches,
            phases,
            league_phase_end: None,
            knockout_stages: Vec::new(),
        }
    }

    pub fn phase(&self, template_id: u32) -> Option<&PhaseTemplate> {
        self.phases.iter().find(|phase| phase.id == template_id)
    }
}

impl PhaseTemplate {
    pub fn new(id: u32, name: String, is_knockout: bool, is_two_legged: bool) -> Self {
        PhaseTemplate {
            id,
            name,
            is_knockout,
            is_two_legged,
        }
    }
}
