use crate::season::{SeasonEvent, SeasonEventType};
use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use log::debug;

/// Transfer windows open for one week at the start of the season and
/// again at its midpoint.
const TRANSFER_WINDOW_DAYS: i64 = 7;

/// Builds the season's day-by-day event calendar: one event per day from
/// the start date to start + 1 year − 1 day, classified by priority
/// (season boundaries, then transfer windows, then weekday defaults).
pub struct SeasonCalendarBuilder;

impl SeasonCalendarBuilder {
    pub fn build(start_date: NaiveDate) -> Vec<SeasonEvent> {
        let end_date = Self::season_end(start_date);
        let total_days = (end_date - start_date).num_days();
        let midpoint = total_days / 2;

        debug!(
            "building season calendar {} - {} ({} days)",
            start_date,
            end_date,
            total_days + 1
        );

        (0..=total_days)
            .map(|offset| {
                let date = start_date + Duration::days(offset);
                SeasonEvent::new(date, Self::classify(date, offset, total_days, midpoint))
            })
            .collect()
    }

    pub fn season_end(start_date: NaiveDate) -> NaiveDate {
        start_date
            .checked_add_months(Months::new(12))
            .and_then(|date| date.pred_opt())
            .unwrap()
    }

    fn classify(date: NaiveDate, offset: i64, total_days: i64, midpoint: i64) -> SeasonEventType {
        if offset == 0 {
            return SeasonEventType::SeasonStart;
        }

        if offset == total_days {
            return SeasonEventType::SeasonEnd;
        }

        if offset < TRANSFER_WINDOW_DAYS {
            return SeasonEventType::TransferWindow;
        }

        if offset >= midpoint && offset < midpoint + TRANSFER_WINDOW_DAYS {
            return SeasonEventType::TransferWindow;
        }

        match date.weekday() {
            Weekday::Tue => SeasonEventType::ContinentalMatch,
            Weekday::Thu => SeasonEventType::CupMatch,
            Weekday::Sat => SeasonEventType::ChampionshipMatch,
            _ => SeasonEventType::TrainingDay,
        }
    }
}
