//! Leave request and analysis domain types.

use serde::{Deserialize, Serialize};

use crate::resident::ResidentId;

/// Category of leave a resident may request.
///
/// `Compassionate` is the one type exempt from the minimum-notice policy
/// check (SPEC_FULL §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Vacation,
    Conference,
    Sick,
    Compassionate,
    Parental,
    Study,
}

/// Lifecycle status of a `LeaveRequest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    PendingAnalysis,
    PendingApproval,
    Approved,
    Denied,
    FlaggedForReview,
    AnalysisFailed,
}

/// A resident's request for time off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: uuid::Uuid,
    pub resident_id: ResidentId,
    pub leave_type: LeaveType,
    pub status: LeaveStatus,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub requested_at: chrono::DateTime<chrono::Utc>,
    pub analysis_report_id: Option<uuid::Uuid>,
}

impl LeaveRequest {
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn overlaps(&self, start: chrono::NaiveDate, end: chrono::NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }

    /// Calendar days between the request being made and the leave starting.
    pub fn days_notice(&self, as_of: chrono::NaiveDate) -> i64 {
        (self.start_date - as_of).num_days()
    }
}

/// Coverage risk bucket for a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Coverage impact assessment (SPEC_FULL §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageAssessment {
    pub total_residents: u32,
    pub overlapping_leave_count: u32,
    pub available_residents: i64,
    pub ratio: f64,
    pub risk_level: RiskLevel,
}

/// Fairness assessment over the trailing six months (SPEC_FULL §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairnessAssessment {
    pub recent_days_off: i64,
    pub historical_approval_rate: f64,
    pub peer_comparison: f64,
    pub score: f64,
}

/// Kind of schedule conflict a requested leave period collides with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    Call,
    Or,
    Clinic,
}

/// Severity of a schedule conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSeverity {
    Medium,
    High,
}

/// A single date on which the requested leave collides with an existing duty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConflict {
    pub conflict_type: ConflictType,
    pub date: chrono::NaiveDate,
    pub description: String,
    pub severity: ConflictSeverity,
}

/// A single policy-compliance violation (SPEC_FULL §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PolicyViolation {
    InsufficientNotice { days_notice: i64, required: i64 },
    ExceedsMaxConsecutiveDays { requested: i64, max: i64 },
    ExceedsAnnualLimit { year_total_after: i64, limit: i64 },
}

/// Final recommendation synthesized by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Approve,
    FlaggedForReview,
    Deny,
}

/// Write-once synthesis of coverage, fairness, conflicts, and policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveAnalysisReport {
    pub id: uuid::Uuid,
    pub request_id: uuid::Uuid,
    pub coverage: CoverageAssessment,
    pub fairness: FairnessAssessment,
    pub conflicts: Vec<ScheduleConflict>,
    pub policy_violations: Vec<PolicyViolation>,
    pub alternative_dates: Vec<(chrono::NaiveDate, chrono::NaiveDate)>,
    pub recommendation: Recommendation,
    pub reason: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(start: &str, end: &str) -> LeaveRequest {
        LeaveRequest {
            id: uuid::Uuid::new_v4(),
            resident_id: "r1".into(),
            leave_type: LeaveType::Vacation,
            status: LeaveStatus::PendingAnalysis,
            start_date: NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            end_date: NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
            requested_at: chrono::Utc::now(),
            analysis_report_id: None,
        }
    }

    #[test]
    fn duration_is_inclusive() {
        let r = request("2025-02-01", "2025-02-03");
        assert_eq!(r.duration_days(), 3);
    }

    #[test]
    fn overlap_detection_is_inclusive_on_both_ends() {
        let r = request("2025-02-10", "2025-02-14");
        assert!(r.overlaps(
            NaiveDate::parse_from_str("2025-02-14", "%Y-%m-%d").unwrap(),
            NaiveDate::parse_from_str("2025-02-20", "%Y-%m-%d").unwrap()
        ));
        assert!(!r.overlaps(
            NaiveDate::parse_from_str("2025-02-15", "%Y-%m-%d").unwrap(),
            NaiveDate::parse_from_str("2025-02-20", "%Y-%m-%d").unwrap()
        ));
    }
}
