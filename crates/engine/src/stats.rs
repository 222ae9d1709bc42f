//! Running per-resident call statistics consulted by eligibility and scoring.

use std::collections::HashMap;

use chrono::NaiveDate;
use rotasched_domain::{CallAssignment, ResidentId};

/// A resident's call history as of a point in the monthly scheduling run.
///
/// `call_dates` is kept sorted ascending; it is small (at most one call per
/// day across a single academic year) so a linear scan for the rolling
/// window is simpler than a tree and fast enough for a roster this size.
#[derive(Debug, Clone, Default)]
pub struct CallStats {
    pub total_calls: u32,
    pub total_points: u32,
    pub weekend_calls: u32,
    pub holiday_calls: u32,
    pub last_call_date: Option<NaiveDate>,
    call_dates: Vec<NaiveDate>,
}

impl CallStats {
    pub fn record(&mut self, assignment: &CallAssignment) {
        if assignment.call_type.is_post_call() {
            return;
        }
        self.total_calls += 1;
        self.total_points += assignment.points;
        match assignment.call_type {
            rotasched_domain::CallType::Weekend => self.weekend_calls += 1,
            rotasched_domain::CallType::Holiday => self.holiday_calls += 1,
            _ => {}
        }
        self.last_call_date = Some(self.last_call_date.map_or(assignment.date, |d| d.max(assignment.date)));
        self.call_dates.push(assignment.date);
        self.call_dates.sort_unstable();
    }

    /// Calls falling within the `window_days` trailing `as_of` (inclusive of `as_of`).
    ///
    /// Used by the PARO 1-in-4 averaged rule: over any rolling 28-day window a
    /// resident may not average more than one call in four days.
    pub fn recent_calls(&self, as_of: NaiveDate, window_days: i64) -> u32 {
        let earliest = as_of - chrono::Duration::days(window_days - 1);
        self.call_dates
            .iter()
            .filter(|d| **d >= earliest && **d <= as_of)
            .count() as u32
    }

    /// Whether `date` falls immediately after `last_call_date` (post-call rest, invariant 3).
    pub fn is_post_call_day(&self, date: NaiveDate) -> bool {
        self.last_call_date == Some(date - chrono::Duration::days(1))
    }
}

/// Per-resident stats accumulated over a block, seeded at zero for every
/// roster member so lookups never need an `Option`.
pub fn initial_stats(resident_ids: impl IntoIterator<Item = ResidentId>) -> HashMap<ResidentId, CallStats> {
    resident_ids
        .into_iter()
        .map(|id| (id, CallStats::default()))
        .collect()
}
