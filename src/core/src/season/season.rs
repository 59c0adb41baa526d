use crate::season::calendar::SeasonCalendarBuilder;
use crate::shared::CompetitionType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Event classification for one calendar day. Match fixtures may only be
/// placed on days of the matching type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonEventType {
    SeasonStart,
    SeasonEnd,
    TransferWindow,
    ChampionshipMatch,
    CupMatch,
    ContinentalMatch,
    TrainingDay,
    Other,
}

/// One day of the season calendar. Created in bulk when the season is
/// generated; afterwards only the `occupied` flag ever changes, and an
/// occupied event is never handed out again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonEvent {
    pub date: NaiveDate,
    pub event_type: SeasonEventType,
    pub occupied: bool,
}

impl SeasonEvent {
    pub fn new(date: NaiveDate, event_type: SeasonEventType) -> Self {
        SeasonEvent {
            date,
            event_type,
            occupied: false,
        }
    }
}

/// One year-long play period with its day-by-day event calendar and a
/// record of which competitions have already had their season-end
/// results resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    pub id: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub current_date: NaiveDate,
    pub active: bool,
    pub events: Vec<SeasonEvent>,
    resolved_competitions: HashSet<(CompetitionType, u32)>,
}

impl Season {
    pub fn new(id: u32, start_date: NaiveDate) -> Self {
        let events = SeasonCalendarBuilder::build(start_date);
        let end_date = events
            .last()
            .map(|event| event.date)
            .unwrap_or(start_date);

        Season {
            id,
            start_date,
            end_date,
            current_date: start_date,
            active: true,
            events,
            resolved_competitions: HashSet::new(),
        }
    }

    pub fn is_resolved(&self, competition_type: CompetitionType, competition_id: u32) -> bool {
        self.resolved_competitions
            .contains(&(competition_type, competition_id))
    }

    pub fn mark_resolved(&mut self, competition_type: CompetitionType, competition_id: u32) {
        self.resolved_competitions
            .insert((competition_type, competition_id));
    }

    pub fn occupied_event_count(&self) -> usize {
        self.events.iter().filter(|event| event.occupied).count()
    }
}
