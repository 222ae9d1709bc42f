//! Leave Request Analyzer: synthesizes coverage, fairness, conflict, and
//! policy assessments for a single leave request (SPEC_FULL §4.5).

use chrono::{Datelike, Duration, NaiveDate};
use rotasched_domain::{
    CallType, ConflictSeverity, ConflictType, CoverageAssessment, FairnessAssessment,
    LeaveAnalysisReport, LeavePolicy, LeaveRequest, LeaveStatus, LeaveType, PolicyViolation,
    Recommendation, RiskLevel, ScheduleConflict,
};
use rotasched_storage::ScheduleStore;

/// Trailing window, in days, consulted for the fairness assessment.
const FAIRNESS_LOOKBACK_DAYS: i64 = 180;

/// `peerAverageDaysOff` fallback when peer-cohort leave history isn't
/// available (SPEC_FULL §4.5 names this exact default). The six-read fan-out
/// does not fetch leave history for every peer in a resident's pgy/specialty
/// cohort, only for the requester, so this default is always the one used;
/// recorded as an Open Question resolution in DESIGN.md.
const PEER_AVERAGE_DAYS_OFF_DEFAULT: f64 = 10.0;

/// How long the six-way concurrent read fan-out is allowed to take before
/// the analysis is abandoned (SPEC_FULL §4.5).
const ANALYZER_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum LeaveAnalyzerError {
    #[error("leave analysis timed out reading supporting data")]
    Timeout,
    #[error(transparent)]
    Storage(#[from] rotasched_storage::StorageError),
}

struct Inputs {
    residents: Vec<rotasched_domain::Resident>,
    configuration: rotasched_domain::AppConfiguration,
    external_rotators: Vec<rotasched_domain::ExternalRotator>,
    overlapping_leaves: Vec<LeaveRequest>,
    resident_history: Vec<LeaveRequest>,
    overlapping_calls: Vec<rotasched_domain::CallAssignment>,
}

async fn fetch_inputs(
    store: &dyn ScheduleStore,
    request: &LeaveRequest,
    as_of: NaiveDate,
) -> Result<Inputs, LeaveAnalyzerError> {
    let history_start = as_of - Duration::days(FAIRNESS_LOOKBACK_DAYS);

    let fan_out = async {
        tokio::join!(
            store.list_residents(),
            store.get_configuration(),
            store.list_external_rotators(),
            store.list_leave_requests_overlapping(request.start_date, request.end_date),
            store.list_leave_requests_overlapping(history_start, as_of),
            store.list_call_assignments(request.start_date, request.end_date),
        )
    };

    let (residents, configuration, external_rotators, overlapping_leaves, resident_history, overlapping_calls) =
        tokio::time::timeout(ANALYZER_TIMEOUT, fan_out)
            .await
            .map_err(|_| LeaveAnalyzerError::Timeout)?;

    Ok(Inputs {
        residents: residents?,
        configuration: configuration?,
        external_rotators: external_rotators?,
        overlapping_leaves: overlapping_leaves?
            .into_iter()
            .filter(|r| r.id != request.id)
            .collect(),
        resident_history: resident_history?
            .into_iter()
            .filter(|r| r.resident_id == request.resident_id && r.id != request.id)
            .collect(),
        overlapping_calls: overlapping_calls?,
    })
}

fn count_weekend_days(start: NaiveDate, end: NaiveDate, weekend_definition: &[chrono::Weekday]) -> u32 {
    let mut count = 0u32;
    let mut day = start;
    while day <= end {
        if rotasched_calendar::is_weekend(day, weekend_definition) {
            count += 1;
        }
        day = day.succ_opt().expect("request range is bounded");
    }
    count
}

fn coverage_ratio_and_risk(total_residents: u32, overlapping_leave_count: u32, augmentation: i64) -> (i64, f64, RiskLevel) {
    let available = total_residents as i64 - overlapping_leave_count as i64 - 1 + augmentation;
    let ratio = if total_residents == 0 { 0.0 } else { available as f64 / total_residents as f64 };
    let risk_level = if ratio >= 0.8 {
        RiskLevel::Low
    } else if ratio >= 0.6 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    };
    (available, ratio, risk_level)
}

fn assess_coverage(inputs: &Inputs, start: NaiveDate, end: NaiveDate) -> CoverageAssessment {
    let total_residents = inputs.residents.len() as u32;
    let augmentation = inputs.external_rotators.iter().filter(|r| r.overlaps(start, end)).count() as i64;
    let overlapping_leave_count = inputs
        .overlapping_leaves
        .iter()
        .filter(|l| l.status == LeaveStatus::Approved)
        .count() as u32;
    let (available_residents, ratio, mut risk_level) = coverage_ratio_and_risk(total_residents, overlapping_leave_count, augmentation);

    // Escalate on a weekend-heavy request: coverage that looked fine on an
    // average-mix ratio can still strand the on-call rotation on weekends.
    let weekend_days = count_weekend_days(start, end, &inputs.configuration.monthly_scheduler_config.weekend_definition);
    if weekend_days > 4 {
        risk_level = RiskLevel::High;
    } else if weekend_days > 2 && risk_level == RiskLevel::Low {
        risk_level = RiskLevel::Medium;
    }

    CoverageAssessment {
        total_residents,
        overlapping_leave_count,
        available_residents,
        ratio,
        risk_level,
    }
}

fn assess_fairness(inputs: &Inputs, request: &LeaveRequest) -> FairnessAssessment {
    let recent_days_off: i64 = inputs
        .resident_history
        .iter()
        .filter(|r| r.status == LeaveStatus::Approved)
        .map(|r| r.duration_days())
        .sum();

    let same_month: Vec<&LeaveRequest> = inputs
        .resident_history
        .iter()
        .filter(|r| r.start_date.month() == request.start_date.month())
        .collect();
    let historical_approval_rate = if same_month.is_empty() {
        0.5
    } else {
        let approved = same_month.iter().filter(|r| r.status == LeaveStatus::Approved).count();
        approved as f64 / same_month.len() as f64
    };

    let peer_comparison = recent_days_off as f64 / PEER_AVERAGE_DAYS_OFF_DEFAULT;

    let pgy_level = inputs
        .residents
        .iter()
        .find(|r| r.id == request.resident_id)
        .map(|r| r.pgy_level)
        .unwrap_or(0);

    let mut score = 100.0;
    score -= if recent_days_off > 15 {
        30.0
    } else if recent_days_off > 10 {
        20.0
    } else if recent_days_off > 5 {
        10.0
    } else {
        0.0
    };
    score -= if peer_comparison > 1.5 {
        20.0
    } else if peer_comparison > 1.2 {
        10.0
    } else {
        0.0
    };
    if peer_comparison < 0.5 {
        score += 10.0;
    }
    score += 2.0 * pgy_level as f64;
    score = score.clamp(0.0, 100.0);

    FairnessAssessment {
        recent_days_off,
        historical_approval_rate,
        peer_comparison,
        score,
    }
}

/// A resident's requested period colliding with their own existing call
/// assignment. Weekend/holiday calls are the hardest to re-cover on short
/// notice, so they carry `High` severity; a weeknight call is `Medium`.
///
/// OR-slot and per-week clinical-schedule conflicts (`ConflictType::Or` /
/// `::Clinic`) are part of the domain model but this store does not expose
/// an OR-slot or clinic-schedule collection (SPEC_FULL §6.1 lists
/// `weeklySchedules/{yyyy-Www}` but the port has no read method for it);
/// recorded as an Open Question resolution in DESIGN.md rather than
/// fabricated here.
fn find_conflicts(inputs: &Inputs, request: &LeaveRequest) -> Vec<ScheduleConflict> {
    inputs
        .overlapping_calls
        .iter()
        .filter(|c| c.resident_id == request.resident_id && !c.call_type.is_post_call())
        .map(|c| {
            let severity = match c.call_type {
                CallType::Weekend | CallType::Holiday => ConflictSeverity::High,
                _ => ConflictSeverity::Medium,
            };
            ScheduleConflict {
                conflict_type: ConflictType::Call,
                date: c.date,
                description: format!("resident is already scheduled for {:?} call on {}", c.call_type, c.date),
                severity,
            }
        })
        .collect()
}

fn check_policy(inputs: &Inputs, request: &LeaveRequest, policy: &LeavePolicy, as_of: NaiveDate) -> Vec<PolicyViolation> {
    let mut violations = Vec::new();

    if request.leave_type != LeaveType::Compassionate {
        let days_notice = request.days_notice(as_of);
        if days_notice < policy.min_notice_days {
            violations.push(PolicyViolation::InsufficientNotice {
                days_notice,
                required: policy.min_notice_days,
            });
        }
    }

    let requested = request.duration_days();
    if requested > policy.max_consecutive_days {
        violations.push(PolicyViolation::ExceedsMaxConsecutiveDays {
            requested,
            max: policy.max_consecutive_days,
        });
    }

    let this_year_days: i64 = inputs
        .resident_history
        .iter()
        .filter(|r| r.status == LeaveStatus::Approved && r.start_date.year() == request.start_date.year())
        .map(|r| r.duration_days())
        .sum();
    let year_total_after = this_year_days + requested;
    if year_total_after > policy.annual_limit {
        violations.push(PolicyViolation::ExceedsAnnualLimit {
            year_total_after,
            limit: policy.annual_limit,
        });
    }

    violations
}

/// Synthesizes the final recommendation from the four assessments, in the
/// exact priority order of SPEC_FULL §4.5: a high-severity conflict or two or
/// more policy violations denies outright; thin coverage under a ratio floor
/// also denies; any single remaining concern (medium coverage, weak fairness,
/// any conflict, any policy violation) flags the request for human review.
fn recommend(
    coverage: &CoverageAssessment,
    fairness: &FairnessAssessment,
    conflicts: &[ScheduleConflict],
    policy_violations: &[PolicyViolation],
) -> (Recommendation, String) {
    if let Some(conflict) = conflicts.iter().find(|c| c.severity == ConflictSeverity::High) {
        return (Recommendation::Deny, format!("schedule conflict: {}", conflict.description));
    }
    if policy_violations.len() >= 2 {
        return (Recommendation::Deny, "multiple leave policy violations".to_string());
    }
    if coverage.risk_level == RiskLevel::High && coverage.ratio < 0.5 {
        return (Recommendation::Deny, "coverage risk is high with too few available residents".to_string());
    }

    let concerns = [
        coverage.risk_level == RiskLevel::Medium,
        fairness.score < 40.0,
        !conflicts.is_empty(),
        !policy_violations.is_empty(),
    ]
    .into_iter()
    .filter(|concern| *concern)
    .count();

    if concerns >= 1 {
        (Recommendation::FlaggedForReview, "coverage, fairness, conflict, or policy concerns require review".to_string())
    } else {
        (Recommendation::Approve, "no coverage, fairness, or policy concerns".to_string())
    }
}

/// Searches a ±14-day, day-step window for a same-duration period disjoint
/// from `request` whose coverage would be Low and strictly better than the
/// original, returning up to three (SPEC_FULL §4.5).
async fn find_alternative_dates(
    store: &dyn ScheduleStore,
    request: &LeaveRequest,
    current_ratio: f64,
) -> Result<Vec<(NaiveDate, NaiveDate)>, LeaveAnalyzerError> {
    let span = request.end_date - request.start_date;
    let residents = store.list_residents().await?;
    let total_residents = residents.len() as u32;

    let mut alternatives = Vec::new();
    for shift in (-14i64..=14).filter(|shift| *shift != 0) {
        if alternatives.len() >= 3 {
            break;
        }
        let start = request.start_date + Duration::days(shift);
        let end = start + span;
        if start <= request.end_date && request.start_date <= end {
            continue;
        }

        let overlapping = store.list_leave_requests_overlapping(start, end).await?;
        let overlapping_leave_count = overlapping
            .iter()
            .filter(|l| l.id != request.id && l.status == LeaveStatus::Approved)
            .count() as u32;
        let (_, ratio, risk_level) = coverage_ratio_and_risk(total_residents, overlapping_leave_count, 0);

        if risk_level == RiskLevel::Low && ratio > current_ratio {
            alternatives.push((start, end));
        }
    }
    Ok(alternatives)
}

/// Runs the full leave analysis for `request` as of `as_of`, returning a
/// report ready to be written back atomically via
/// [`rotasched_storage::ScheduleStore::record_leave_analysis`].
pub async fn analyze_leave_request(
    store: &dyn ScheduleStore,
    request: &LeaveRequest,
    as_of: NaiveDate,
) -> Result<LeaveAnalysisReport, LeaveAnalyzerError> {
    let inputs = fetch_inputs(store, request, as_of).await?;

    let coverage = assess_coverage(&inputs, request.start_date, request.end_date);
    let fairness = assess_fairness(&inputs, request);
    let conflicts = find_conflicts(&inputs, request);
    let policy_violations = check_policy(&inputs, request, &inputs.configuration.leave_policy, as_of);
    let (recommendation, reason) = recommend(&coverage, &fairness, &conflicts, &policy_violations);

    let alternative_dates = if recommendation == Recommendation::Approve {
        Vec::new()
    } else {
        find_alternative_dates(store, request, coverage.ratio).await?
    };

    Ok(LeaveAnalysisReport {
        id: uuid::Uuid::new_v4(),
        request_id: request.id,
        coverage,
        fairness,
        conflicts,
        policy_violations,
        alternative_dates,
        recommendation,
        reason,
        generated_at: chrono::Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotasched_domain::{CallAssignment, LeavePolicy, MonthlySchedulerConfig, YearlySchedulerConfig};
    use rotasched_storage::InMemoryStore;

    fn config() -> rotasched_domain::AppConfiguration {
        rotasched_domain::AppConfiguration {
            monthly_scheduler_config: MonthlySchedulerConfig {
                paro_hard_caps: vec![],
                call_ratios: Default::default(),
                max_weekends_per_rotation: 2,
                weekend_definition: vec![],
            },
            yearly_scheduler_config: YearlySchedulerConfig::default(),
            coverage_rules: vec![],
            leave_policy: LeavePolicy {
                min_notice_days: 14,
                max_consecutive_days: 14,
                annual_limit: 28,
            },
            holidays: vec![],
        }
    }

    fn residents(n: usize) -> Vec<rotasched_domain::Resident> {
        (1..=n)
            .map(|i| rotasched_domain::Resident {
                id: format!("r{i}"),
                name: format!("Dr. {i}"),
                pgy_level: 3,
                specialty: "Neurosurgery".to_string(),
                on_service: true,
                is_chief: false,
                call_exempt: false,
                annual_leave_quota: 20,
            })
            .collect()
    }

    #[tokio::test]
    async fn short_notice_vacation_is_flagged_for_review() {
        let store = InMemoryStore::new();
        store.seed(residents(10), vec![], config()).await;

        let as_of = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let request = LeaveRequest {
            id: uuid::Uuid::new_v4(),
            resident_id: "r1".to_string(),
            leave_type: LeaveType::Vacation,
            status: LeaveStatus::PendingAnalysis,
            start_date: as_of + Duration::days(2),
            end_date: as_of + Duration::days(4),
            requested_at: chrono::Utc::now(),
            analysis_report_id: None,
        };
        use rotasched_storage::ScheduleStore;
        store.put_leave_request(request.clone()).await.unwrap();

        // A single policy violation (insufficient notice) is not enough to
        // deny outright (SPEC_FULL §4.5 requires two or more); it flags.
        let report = analyze_leave_request(&store, &request, as_of).await.unwrap();
        assert_eq!(report.recommendation, Recommendation::FlaggedForReview);
        assert!(!report.policy_violations.is_empty());
    }

    #[tokio::test]
    async fn two_policy_violations_deny_the_request() {
        let store = InMemoryStore::new();
        store.seed(residents(10), vec![], config()).await;

        let as_of = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        // Short notice (2 days < 14) and over the 14-day consecutive cap (20 days).
        let request = LeaveRequest {
            id: uuid::Uuid::new_v4(),
            resident_id: "r1".to_string(),
            leave_type: LeaveType::Vacation,
            status: LeaveStatus::PendingAnalysis,
            start_date: as_of + Duration::days(2),
            end_date: as_of + Duration::days(21),
            requested_at: chrono::Utc::now(),
            analysis_report_id: None,
        };
        use rotasched_storage::ScheduleStore;
        store.put_leave_request(request.clone()).await.unwrap();

        let report = analyze_leave_request(&store, &request, as_of).await.unwrap();
        assert_eq!(report.recommendation, Recommendation::Deny);
        assert!(report.policy_violations.len() >= 2);
    }

    #[tokio::test]
    async fn compassionate_leave_is_exempt_from_notice_policy() {
        let store = InMemoryStore::new();
        store.seed(residents(10), vec![], config()).await;

        let as_of = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let request = LeaveRequest {
            id: uuid::Uuid::new_v4(),
            resident_id: "r1".to_string(),
            leave_type: LeaveType::Compassionate,
            status: LeaveStatus::PendingAnalysis,
            start_date: as_of + Duration::days(1),
            end_date: as_of + Duration::days(2),
            requested_at: chrono::Utc::now(),
            analysis_report_id: None,
        };
        use rotasched_storage::ScheduleStore;
        store.put_leave_request(request.clone()).await.unwrap();

        let report = analyze_leave_request(&store, &request, as_of).await.unwrap();
        assert!(!report
            .policy_violations
            .iter()
            .any(|v| matches!(v, PolicyViolation::InsufficientNotice { .. })));
    }

    #[tokio::test]
    async fn well_staffed_roster_with_ample_notice_is_approved() {
        let store = InMemoryStore::new();
        store.seed(residents(20), vec![], config()).await;

        let as_of = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let request = LeaveRequest {
            id: uuid::Uuid::new_v4(),
            resident_id: "r1".to_string(),
            leave_type: LeaveType::Vacation,
            status: LeaveStatus::PendingAnalysis,
            start_date: as_of + Duration::days(30),
            end_date: as_of + Duration::days(33),
            requested_at: chrono::Utc::now(),
            analysis_report_id: None,
        };
        use rotasched_storage::ScheduleStore;
        store.put_leave_request(request.clone()).await.unwrap();

        let report = analyze_leave_request(&store, &request, as_of).await.unwrap();
        assert_eq!(report.recommendation, Recommendation::Approve);
        assert!(report.alternative_dates.is_empty());
    }

    #[tokio::test]
    async fn overlapping_weekend_call_denies_the_request() {
        let store = InMemoryStore::new();
        store.seed(residents(10), vec![], config()).await;
        use rotasched_storage::ScheduleStore;

        let as_of = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let request = LeaveRequest {
            id: uuid::Uuid::new_v4(),
            resident_id: "r1".to_string(),
            leave_type: LeaveType::Vacation,
            status: LeaveStatus::PendingAnalysis,
            start_date: as_of + Duration::days(30),
            end_date: as_of + Duration::days(33),
            requested_at: chrono::Utc::now(),
            analysis_report_id: None,
        };
        store.put_leave_request(request.clone()).await.unwrap();
        store
            .replace_call_assignments(
                request.start_date,
                request.start_date,
                vec![CallAssignment::new("r1".to_string(), request.start_date, CallType::Weekend, false, None)],
            )
            .await
            .unwrap();

        let report = analyze_leave_request(&store, &request, as_of).await.unwrap();
        assert_eq!(report.recommendation, Recommendation::Deny);
        assert!(report.conflicts.iter().any(|c| c.severity == ConflictSeverity::High));
    }
}
