//! Monthly Call Scheduler: greedy day-by-day call assignment within a single
//! rotation block (SPEC_FULL §4.4, §6.1).

use std::collections::HashMap;

use chrono::NaiveDate;
use rotasched_domain::{AppConfiguration, CallAssignment, CallType, LeaveRequest, Resident, ResidentId, RotationBlock, StaffingLevel};

use crate::eligibility;
use crate::scoring::{self, ScoringAverages};
use crate::stats;

/// Per-run metrics surfaced alongside the generated calls (SPEC_FULL §6.1).
#[derive(Debug, Clone)]
pub struct MonthlyMetrics {
    pub calls_per_resident: HashMap<ResidentId, u32>,
    pub gini_coefficient: f64,
    pub unfillable_dates: Vec<NaiveDate>,
}

/// The full output of one monthly scheduling run.
#[derive(Debug, Clone)]
pub struct MonthlyScheduleResult {
    pub calls: Vec<CallAssignment>,
    pub metrics: MonthlyMetrics,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayPriority {
    Holiday,
    Weekend,
    Weekday,
}

fn classify(date: NaiveDate, holidays: &[NaiveDate], config: &AppConfiguration) -> (CallType, DayPriority) {
    if rotasched_calendar::is_holiday(date, holidays) {
        (CallType::Holiday, DayPriority::Holiday)
    } else if rotasched_calendar::is_weekend(date, &config.monthly_scheduler_config.weekend_definition) {
        (CallType::Weekend, DayPriority::Weekend)
    } else {
        (CallType::Night, DayPriority::Weekday)
    }
}

/// Number of residents required to cover a single day of `call_type`
/// (SPEC_FULL §4.4 step 2): holidays need two, weekends and weeknights need one.
fn required_coverage(call_type: CallType) -> usize {
    match call_type {
        CallType::Holiday => 2,
        CallType::Weekend | CallType::Night => 1,
        CallType::PostCall => 0,
    }
}

/// Generates call assignments for every day of `block`, filling the scarcest
/// days (holidays, then weekends, then weekdays) first so that a roster
/// running short on eligible residents fails on the easiest days to leave
/// uncovered, not the hardest. `leave_requests` is every leave request
/// touching the block regardless of status: approved leave excludes a
/// resident from eligibility, pending/denied leave only penalizes their score.
pub fn generate_monthly_schedule(
    residents: &[Resident],
    block: &RotationBlock,
    config: &AppConfiguration,
    staffing_level: StaffingLevel,
    leave_requests: &[LeaveRequest],
) -> MonthlyScheduleResult {
    let holidays = rotasched_calendar::holidays_in_range(&config.holidays, block.start_date, block.end_date);

    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut current = block.start_date;
    while current <= block.end_date {
        dates.push(current);
        current = current.succ_opt().expect("block end date is bounded");
    }
    dates.sort_by_key(|d| {
        let (_, priority) = classify(*d, &holidays, config);
        (priority_rank(priority), *d)
    });

    let mut stats_by_resident = stats::initial_stats(residents.iter().map(|r| r.id.clone()));
    let mut calls = Vec::new();
    let mut warnings = Vec::new();
    let mut unfillable_dates = Vec::new();

    for date in dates {
        let (call_type, _) = classify(date, &holidays, config);
        let is_holiday = call_type == CallType::Holiday;
        let mut selected_today: Vec<ResidentId> = Vec::new();

        for _ in 0..required_coverage(call_type) {
            let eligible: Vec<&Resident> = residents
                .iter()
                .filter(|r| {
                    if selected_today.contains(&r.id) {
                        return false;
                    }
                    let stats = stats_by_resident.get(&r.id).expect("seeded for every resident");
                    eligibility::evaluate(r, stats, date, call_type, block, config, staffing_level, leave_requests).is_ok()
                })
                .collect();

            if eligible.is_empty() {
                warnings.push(format!("no eligible resident found for {date}"));
                if !unfillable_dates.contains(&date) {
                    unfillable_dates.push(date);
                }
                break;
            }

            let averages = ScoringAverages::compute(residents, &stats_by_resident, block);
            let mut scored: Vec<(ResidentId, f64, u32)> = eligible
                .iter()
                .map(|r| {
                    let stats = stats_by_resident.get(&r.id).expect("seeded for every resident");
                    let team = block.assignment_for(&r.id).and_then(|a| a.team);
                    let breakdown = scoring::score(r, stats, date, call_type, team, &averages, leave_requests);
                    (r.id.clone(), breakdown.total, stats.total_calls)
                })
                .collect();

            // Highest score wins; ties broken by ascending call count, then
            // ascending resident id, for a fully deterministic schedule.
            scored.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.2.cmp(&b.2))
                    .then(a.0.cmp(&b.0))
            });
            let chosen_id = scored[0].0.clone();
            let chosen = residents.iter().find(|r| r.id == chosen_id).expect("chosen from residents");
            let team = block.assignment_for(&chosen.id).and_then(|a| a.team);

            let assignment = CallAssignment::new(chosen.id.clone(), date, call_type, is_holiday, team);
            stats_by_resident
                .get_mut(&chosen.id)
                .expect("seeded for every resident")
                .record(&assignment);
            calls.push(assignment);
            selected_today.push(chosen.id.clone());

            let post_call_date = date.succ_opt().expect("block bounded");
            if post_call_date <= block.end_date {
                calls.push(CallAssignment::new(chosen.id.clone(), post_call_date, CallType::PostCall, false, team));
            }
        }
    }

    let calls_per_resident: HashMap<ResidentId, u32> = stats_by_resident
        .iter()
        .map(|(id, s)| (id.clone(), s.total_calls))
        .collect();
    let gini_input: Vec<u32> = residents.iter().map(|r| *calls_per_resident.get(&r.id).unwrap_or(&0)).collect();

    MonthlyScheduleResult {
        calls,
        metrics: MonthlyMetrics {
            calls_per_resident,
            gini_coefficient: crate::gini::gini_coefficient(&gini_input),
            unfillable_dates,
        },
        warnings,
    }
}

fn priority_rank(priority: DayPriority) -> u8 {
    match priority {
        DayPriority::Holiday => 0,
        DayPriority::Weekend => 1,
        DayPriority::Weekday => 2,
    }
}
