//! Explainable scoring for choosing among eligible residents (SPEC_FULL §4.2).

use std::collections::HashMap;

use chrono::NaiveDate;
use rotasched_domain::{CallType, LeaveRequest, LeaveStatus, Resident, ResidentId, RotationBlock, Team};

use crate::stats::CallStats;

/// Roster-wide averages a candidate's raw stats are scored against, computed
/// once per pick across every resident of the current run (not only eligible
/// ones), so a resident's score is meaningful relative to the block as a
/// whole rather than to an arbitrary absolute scale.
#[derive(Debug, Clone)]
pub struct ScoringAverages {
    pub average_calls: f64,
    pub average_points: f64,
    team_average_calls: HashMap<Team, f64>,
}

impl ScoringAverages {
    pub fn compute(residents: &[Resident], stats_by_resident: &HashMap<ResidentId, CallStats>, block: &RotationBlock) -> Self {
        if residents.is_empty() {
            return Self {
                average_calls: 0.0,
                average_points: 0.0,
                team_average_calls: HashMap::new(),
            };
        }

        let mut total_calls = 0u32;
        let mut total_points = 0u32;
        let mut team_totals: HashMap<Team, (u32, u32)> = HashMap::new();
        for resident in residents {
            let stats = stats_by_resident.get(&resident.id).expect("seeded for every resident");
            total_calls += stats.total_calls;
            total_points += stats.total_points;
            if let Some(team) = block.assignment_for(&resident.id).and_then(|a| a.team) {
                let entry = team_totals.entry(team).or_insert((0, 0));
                entry.0 += stats.total_calls;
                entry.1 += 1;
            }
        }

        let count = residents.len() as f64;
        let team_average_calls = team_totals
            .into_iter()
            .map(|(team, (sum, n))| (team, sum as f64 / n as f64))
            .collect();

        Self {
            average_calls: total_calls as f64 / count,
            average_points: total_points as f64 / count,
            team_average_calls,
        }
    }

    fn team_average(&self, team: Option<Team>) -> f64 {
        team.and_then(|t| self.team_average_calls.get(&t).copied()).unwrap_or(self.average_calls)
    }
}

/// The per-component breakdown behind a candidate's total score, kept around
/// so a scheduling run can explain why one eligible resident was picked over
/// another rather than just emitting a single opaque number.
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub resident_id: ResidentId,
    pub fairness: f64,
    pub rest: f64,
    pub seniority: f64,
    pub points_balance: f64,
    pub team_balance: f64,
    pub pending_leave_penalty: f64,
    pub total: f64,
}

fn has_pending_or_denied_leave(resident_id: &ResidentId, date: NaiveDate, leave_requests: &[LeaveRequest]) -> bool {
    leave_requests.iter().any(|l| {
        l.resident_id == *resident_id
            && l.start_date <= date
            && date <= l.end_date
            && matches!(
                l.status,
                LeaveStatus::PendingAnalysis | LeaveStatus::PendingApproval | LeaveStatus::FlaggedForReview | LeaveStatus::Denied
            )
    })
}

/// Scores `resident` as a candidate for `call_type` on `date`, given their
/// running `stats`, roster-wide `averages`, and any pending/denied leave
/// requests touching the roster. `Score = 100 + Σ components`, clamped to
/// ≥ 0 (SPEC_FULL §4.2).
#[allow(clippy::too_many_arguments)]
pub fn score(
    resident: &Resident,
    stats: &CallStats,
    date: NaiveDate,
    call_type: CallType,
    team: Option<Team>,
    averages: &ScoringAverages,
    leave_requests: &[LeaveRequest],
) -> ScoreBreakdown {
    let fairness = (30.0 - (stats.total_calls as f64 - averages.average_calls) * 10.0).max(0.0);

    let rest = match stats.last_call_date {
        Some(last) => ((date - last).num_days() as f64 * 3.0).min(30.0),
        None => 30.0,
    };

    let seniority = if matches!(call_type, CallType::Weekend | CallType::Holiday) {
        2.0 * resident.pgy_level as f64
    } else {
        0.0
    };

    let points_balance = (20.0 - (stats.total_points as f64 - averages.average_points)).max(0.0);

    let team_balance = (5.0 * (averages.average_calls - averages.team_average(team))).round();

    let pending_leave_penalty = if has_pending_or_denied_leave(&resident.id, date, leave_requests) {
        -50.0
    } else {
        0.0
    };

    let total = (100.0 + fairness + rest + seniority + points_balance + team_balance + pending_leave_penalty).max(0.0);

    ScoreBreakdown {
        resident_id: resident.id.clone(),
        fairness,
        rest,
        seniority,
        points_balance,
        team_balance,
        pending_leave_penalty,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotasched_domain::RotationAssignment;

    fn resident(id: &str, pgy_level: u8) -> Resident {
        Resident {
            id: id.to_string(),
            name: format!("Dr. {id}"),
            pgy_level,
            specialty: "Neurosurgery".to_string(),
            on_service: true,
            is_chief: false,
            call_exempt: false,
            annual_leave_quota: 20,
        }
    }

    fn block() -> RotationBlock {
        RotationBlock {
            block_number: 1,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 9, 28).unwrap(),
            assignments: vec![
                RotationAssignment {
                    resident_id: "light".to_string(),
                    rotation_name: "Core NSX".to_string(),
                    rotation_type: rotasched_domain::RotationType::CoreNsx,
                    team: Some(Team::Red),
                    holiday_type: None,
                },
                RotationAssignment {
                    resident_id: "heavy".to_string(),
                    rotation_name: "Core NSX".to_string(),
                    rotation_type: rotasched_domain::RotationType::CoreNsx,
                    team: Some(Team::Blue),
                    holiday_type: None,
                },
            ],
        }
    }

    #[test]
    fn resident_with_fewer_calls_scores_higher() {
        let b = block();
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let mut stats_by_resident = HashMap::new();
        let mut light = CallStats::default();
        light.total_calls = 2;
        let mut heavy = CallStats::default();
        heavy.total_calls = 8;
        stats_by_resident.insert("light".to_string(), light.clone());
        stats_by_resident.insert("heavy".to_string(), heavy.clone());
        let residents = vec![resident("light", 3), resident("heavy", 3)];
        let averages = ScoringAverages::compute(&residents, &stats_by_resident, &b);

        let light_score = score(&resident("light", 3), &light, date, CallType::Night, Some(Team::Red), &averages, &[]);
        let heavy_score = score(&resident("heavy", 3), &heavy, date, CallType::Night, Some(Team::Blue), &averages, &[]);
        assert!(light_score.total > heavy_score.total);
    }

    #[test]
    fn never_called_resident_gets_full_rest_component() {
        let b = block();
        let mut stats_by_resident = HashMap::new();
        stats_by_resident.insert("light".to_string(), CallStats::default());
        stats_by_resident.insert("heavy".to_string(), CallStats::default());
        let residents = vec![resident("light", 3), resident("heavy", 3)];
        let averages = ScoringAverages::compute(&residents, &stats_by_resident, &b);

        let breakdown = score(
            &resident("light", 3),
            &CallStats::default(),
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            CallType::Night,
            Some(Team::Red),
            &averages,
            &[],
        );
        assert_eq!(breakdown.rest, 30.0);
    }

    #[test]
    fn weekend_call_grants_a_seniority_bonus_to_the_senior_resident() {
        let b = block();
        let mut stats_by_resident = HashMap::new();
        stats_by_resident.insert("light".to_string(), CallStats::default());
        stats_by_resident.insert("heavy".to_string(), CallStats::default());
        let residents = vec![resident("light", 2), resident("heavy", 2)];
        let averages = ScoringAverages::compute(&residents, &stats_by_resident, &b);

        let junior = score(
            &resident("light", 2),
            &CallStats::default(),
            NaiveDate::from_ymd_opt(2025, 9, 6).unwrap(),
            CallType::Weekend,
            Some(Team::Red),
            &averages,
            &[],
        );
        let senior = score(
            &resident("heavy", 6),
            &CallStats::default(),
            NaiveDate::from_ymd_opt(2025, 9, 6).unwrap(),
            CallType::Weekend,
            Some(Team::Blue),
            &averages,
            &[],
        );
        assert!(senior.seniority > junior.seniority);
    }

    #[test]
    fn pending_leave_on_the_date_applies_the_penalty() {
        let b = block();
        let mut stats_by_resident = HashMap::new();
        stats_by_resident.insert("light".to_string(), CallStats::default());
        let residents = vec![resident("light", 3)];
        let averages = ScoringAverages::compute(&residents, &stats_by_resident, &b);
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();

        let leave_requests = vec![LeaveRequest {
            id: uuid::Uuid::new_v4(),
            resident_id: "light".to_string(),
            leave_type: rotasched_domain::LeaveType::Vacation,
            status: LeaveStatus::PendingApproval,
            start_date: date,
            end_date: date,
            requested_at: chrono::Utc::now(),
            analysis_report_id: None,
        }];

        let breakdown = score(&resident("light", 3), &CallStats::default(), date, CallType::Night, None, &averages, &leave_requests);
        assert_eq!(breakdown.pending_leave_penalty, -50.0);
    }
}
