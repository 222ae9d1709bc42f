//! In-memory reference implementation of [`crate::ScheduleStore`], used by
//! the API crate's integration tests and local (non-production) runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rotasched_domain::{
    AcademicYear, AcademicYearId, AppConfiguration, CallAssignment, ExternalRotator,
    LeaveAnalysisReport, LeaveRequest, LeaveStatus, Resident,
};
use tokio::sync::RwLock;

use crate::{ScheduleStore, StorageError};

#[derive(Default)]
struct State {
    residents: Vec<Resident>,
    external_rotators: Vec<ExternalRotator>,
    configuration: Option<AppConfiguration>,
    academic_years: HashMap<String, AcademicYear>,
    call_assignments: Vec<CallAssignment>,
    leave_requests: HashMap<uuid::Uuid, LeaveRequest>,
    leave_analysis_reports: HashMap<uuid::Uuid, LeaveAnalysisReport>,
}

/// An in-process, single-node store backed by `tokio::sync::RwLock`. Data
/// does not survive a process restart; this is a reference adapter for
/// tests and local development, not a production backing store.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a starting roster and configuration. Intended
    /// for tests and local bring-up, not called in production wiring.
    pub async fn seed(
        &self,
        residents: Vec<Resident>,
        external_rotators: Vec<ExternalRotator>,
        configuration: AppConfiguration,
    ) {
        let mut state = self.state.write().await;
        state.residents = residents;
        state.external_rotators = external_rotators;
        state.configuration = Some(configuration);
    }
}

#[async_trait]
impl ScheduleStore for InMemoryStore {
    async fn list_residents(&self) -> Result<Vec<Resident>, StorageError> {
        Ok(self.state.read().await.residents.clone())
    }

    async fn list_external_rotators(&self) -> Result<Vec<ExternalRotator>, StorageError> {
        Ok(self.state.read().await.external_rotators.clone())
    }

    async fn get_configuration(&self) -> Result<AppConfiguration, StorageError> {
        self.state
            .read()
            .await
            .configuration
            .clone()
            .ok_or_else(|| StorageError::NotFound("configuration/main".to_string()))
    }

    async fn get_academic_year(&self, id: &AcademicYearId) -> Result<Option<AcademicYear>, StorageError> {
        Ok(self.state.read().await.academic_years.get(id.as_str()).cloned())
    }

    async fn put_academic_year(&self, year: AcademicYear) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        state.academic_years.insert(year.id.as_str().to_string(), year);
        Ok(())
    }

    async fn list_call_assignments(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CallAssignment>, StorageError> {
        Ok(self
            .state
            .read()
            .await
            .call_assignments
            .iter()
            .filter(|c| c.date >= start && c.date <= end)
            .cloned()
            .collect())
    }

    async fn replace_call_assignments(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        calls: Vec<CallAssignment>,
    ) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        state.call_assignments.retain(|c| c.date < start || c.date > end);
        state.call_assignments.extend(calls);
        Ok(())
    }

    async fn get_leave_request(&self, id: uuid::Uuid) -> Result<Option<LeaveRequest>, StorageError> {
        Ok(self.state.read().await.leave_requests.get(&id).cloned())
    }

    async fn put_leave_request(&self, request: LeaveRequest) -> Result<(), StorageError> {
        self.state.write().await.leave_requests.insert(request.id, request);
        Ok(())
    }

    async fn list_leave_requests_overlapping(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LeaveRequest>, StorageError> {
        Ok(self
            .state
            .read()
            .await
            .leave_requests
            .values()
            .filter(|r| r.overlaps(start, end))
            .cloned()
            .collect())
    }

    async fn record_leave_analysis(
        &self,
        report: LeaveAnalysisReport,
        new_status: LeaveStatus,
    ) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        let request = state
            .leave_requests
            .get_mut(&report.request_id)
            .ok_or_else(|| StorageError::NotFound(format!("leave request {}", report.request_id)))?;
        request.status = new_status;
        request.analysis_report_id = Some(report.id);
        state.leave_analysis_reports.insert(report.id, report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotasched_domain::{LeavePolicy, LeaveType, MonthlySchedulerConfig, YearlySchedulerConfig};

    fn sample_request() -> LeaveRequest {
        LeaveRequest {
            id: uuid::Uuid::new_v4(),
            resident_id: "r1".into(),
            leave_type: LeaveType::Vacation,
            status: LeaveStatus::PendingAnalysis,
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 9, 5).unwrap(),
            requested_at: chrono::Utc::now(),
            analysis_report_id: None,
        }
    }

    #[tokio::test]
    async fn record_leave_analysis_updates_status_and_report_together() {
        let store = InMemoryStore::new();
        let request = sample_request();
        let request_id = request.id;
        store.put_leave_request(request).await.unwrap();

        let report = LeaveAnalysisReport {
            id: uuid::Uuid::new_v4(),
            request_id,
            coverage: rotasched_domain::CoverageAssessment {
                total_residents: 10,
                overlapping_leave_count: 0,
                available_residents: 10,
                ratio: 1.0,
                risk_level: rotasched_domain::RiskLevel::Low,
            },
            fairness: rotasched_domain::FairnessAssessment {
                recent_days_off: 2,
                historical_approval_rate: 0.9,
                peer_comparison: 0.0,
                score: 0.9,
            },
            conflicts: vec![],
            policy_violations: vec![],
            alternative_dates: vec![],
            recommendation: rotasched_domain::Recommendation::Approve,
            reason: "no conflicts".to_string(),
            generated_at: chrono::Utc::now(),
        };

        store
            .record_leave_analysis(report, LeaveStatus::PendingApproval)
            .await
            .unwrap();

        let updated = store.get_leave_request(request_id).await.unwrap().unwrap();
        assert_eq!(updated.status, LeaveStatus::PendingApproval);
        assert!(updated.analysis_report_id.is_some());
    }

    #[tokio::test]
    async fn get_configuration_before_seed_is_not_found() {
        let store = InMemoryStore::new();
        let result = store.get_configuration().await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn seed_round_trips_residents_and_configuration() {
        let store = InMemoryStore::new();
        let config = AppConfiguration {
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
        };
        store.seed(vec![], vec![], config).await;
        assert!(store.get_configuration().await.is_ok());
        assert_eq!(store.list_residents().await.unwrap().len(), 0);
    }
}
