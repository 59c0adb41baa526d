use crate::error::{ScheduleError, ScheduleResult};
use crate::season::{SeasonEvent, SeasonEventType};
use chrono::{Duration, NaiveDate};
use log::{debug, warn};

/// Binds abstract round numbers onto concrete calendar dates of a
/// required event type. Every fixture of one round shares the chosen
/// date, and a calendar event is consumed (marked occupied) at most once.
pub struct DateAllocator;

impl DateAllocator {
    /// Assigns `rounds` dates drawn from unoccupied events of `event_type`.
    ///
    /// When enough candidate dates exist the rounds are spread across the
    /// whole available window by even stride; a single round takes the
    /// earliest candidate. When rounds outnumber candidates, every
    /// candidate is used and trailing dates are synthesized at
    /// `fallback_interval_days` steps so scheduling always makes forward
    /// progress. Occupancy is only flipped once the full assignment is
    /// known, so a failed call leaves the calendar untouched.
    pub fn allocate(
        events: &mut [SeasonEvent],
        event_type: SeasonEventType,
        rounds: usize,
        fallback_interval_days: i64,
    ) -> ScheduleResult<Vec<NaiveDate>> {
        Self::allocate_after(events, event_type, rounds, fallback_interval_days, None)
    }

    /// Same as [`allocate`](Self::allocate), restricted to candidate dates
    /// strictly after `cutoff`. Used to place knockout rounds after the
    /// stage that feeds them.
    pub fn allocate_after(
        events: &mut [SeasonEvent],
        event_type: SeasonEventType,
        rounds: usize,
        fallback_interval_days: i64,
        cutoff: Option<NaiveDate>,
    ) -> ScheduleResult<Vec<NaiveDate>> {
        let candidates: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, event)| {
                event.event_type == event_type
                    && !event.occupied
                    && cutoff.is_none_or(|after| event.date > after)
            })
            .map(|(index, _)| index)
            .collect();

        if candidates.is_empty() {
            return Err(ScheduleError::NoAvailableDates(event_type));
        }

        if rounds == 0 {
            return Ok(Vec::new());
        }

        let chosen = if candidates.len() >= rounds {
            Self::stride_selection(candidates.len(), rounds)
        } else {
            warn!(
                "only {} {:?} dates left for {} rounds, synthesizing the rest",
                candidates.len(),
                event_type,
                rounds
            );
            (0..candidates.len()).collect()
        };

        let mut dates: Vec<NaiveDate> = chosen
            .iter()
            .map(|&position| events[candidates[position]].date)
            .collect();

        // Shortage path: extend past the calendar at a fixed interval.
        while dates.len() < rounds {
            let last = *dates.last().unwrap();
            dates.push(last + Duration::days(fallback_interval_days));
        }

        for position in chosen {
            events[candidates[position]].occupied = true;
        }

        debug!(
            "allocated {} {:?} dates ({} - {})",
            dates.len(),
            event_type,
            dates.first().unwrap(),
            dates.last().unwrap()
        );

        Ok(dates)
    }

    /// Even-stride pick of `rounds` positions out of `candidate_count`,
    /// de-duplicated forward so the result is strictly increasing.
    fn stride_selection(candidate_count: usize, rounds: usize) -> Vec<usize> {
        let mut positions = Vec::with_capacity(rounds);

        for i in 0..rounds {
            let mut position = if rounds == 1 {
                0
            } else {
                ((i * (candidate_count - 1)) as f64 / (rounds - 1) as f64).round() as usize
            };

            if let Some(&previous) = positions.last() {
                if position <= previous {
                    position = previous + 1;
                }
            }

            positions.push(position.min(candidate_count - 1));
        }

        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::SeasonCalendarBuilder;

    fn events() -> Vec<SeasonEvent> {
        SeasonCalendarBuilder::build(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
    }

    #[test]
    fn allocated_dates_are_strictly_increasing_and_distinct() {
        let mut events = events();
        let dates =
            DateAllocator::allocate(&mut events, SeasonEventType::ChampionshipMatch, 38, 7)
                .unwrap();

        assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(dates.len(), 38);
    }

    #[test]
    fn no_event_is_occupied_twice() {
        let mut events = events();

        DateAllocator::allocate(&mut events, SeasonEventType::CupMatch, 4, 7).unwrap();
        let after_first: Vec<NaiveDate> = events
            .iter()
            .filter(|e| e.occupied)
            .map(|e| e.date)
            .collect();

        let second =
            DateAllocator::allocate(&mut events, SeasonEventType::CupMatch, 4, 7).unwrap();

        for date in &second {
            assert!(!after_first.contains(date), "{date} was reused");
        }
    }

    #[test]
    fn rounds_spread_across_the_whole_window() {
        let mut events = events();
        let candidates: Vec<NaiveDate> = events
            .iter()
            .filter(|e| e.event_type == SeasonEventType::ChampionshipMatch)
            .map(|e| e.date)
            .collect();

        let dates =
            DateAllocator::allocate(&mut events, SeasonEventType::ChampionshipMatch, 2, 7)
                .unwrap();

        assert_eq!(dates[0], candidates[0]);
        assert_eq!(dates[1], *candidates.last().unwrap());
    }

    #[test]
    fn shortage_synthesizes_trailing_dates() {
        let mut events = vec![
            SeasonEvent::new(
                NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
                SeasonEventType::CupMatch,
            ),
            SeasonEvent::new(
                NaiveDate::from_ymd_opt(2024, 8, 8).unwrap(),
                SeasonEventType::CupMatch,
            ),
        ];

        let dates = DateAllocator::allocate(&mut events, SeasonEventType::CupMatch, 4, 7).unwrap();

        assert_eq!(dates.len(), 4);
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(2024, 8, 15).unwrap());
        assert_eq!(dates[3], NaiveDate::from_ymd_opt(2024, 8, 22).unwrap());
        assert!(events.iter().all(|e| e.occupied));
    }

    #[test]
    fn zero_candidates_is_a_precondition_failure() {
        let mut events = vec![SeasonEvent::new(
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            SeasonEventType::TrainingDay,
        )];

        let result = DateAllocator::allocate(&mut events, SeasonEventType::CupMatch, 1, 7);

        assert_eq!(
            result,
            Err(ScheduleError::NoAvailableDates(SeasonEventType::CupMatch))
        );
        assert!(!events[0].occupied);
    }

    #[test]
    fn cutoff_restricts_candidates() {
        let mut events = events();
        let cutoff = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        let dates = DateAllocator::allocate_after(
            &mut events,
            SeasonEventType::ContinentalMatch,
            3,
            14,
            Some(cutoff),
        )
        .unwrap();

        assert!(dates.iter().all(|date| *date > cutoff));
    }
}
