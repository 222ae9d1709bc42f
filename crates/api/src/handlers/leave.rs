//! `analyzeLeaveRequest`-trigger handler (SPEC_FULL §4.5, §6.2): submits a
//! new leave request and synchronously runs the Leave Request Analyzer.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;
use validator::Validate;

use rotasched_domain::{CreateLeaveRequestRequest, DomainError, LeaveRequest, LeaveStatus};
use rotasched_storage::ScheduleStore;

use crate::AppState;
use crate::middleware::auth::AdminUser;

#[derive(Debug, Serialize)]
pub struct LeaveRequestResponse {
    pub request: LeaveRequest,
    pub analysis: rotasched_domain::LeaveAnalysisReport,
}

pub async fn create_leave_request(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(req): Json<CreateLeaveRequestRequest>,
) -> Result<Json<LeaveRequestResponse>, DomainError> {
    req.validate().map_err(DomainError::from_validation_errors)?;
    if req.end_date < req.start_date {
        return Err(DomainError::Validation("end_date precedes start_date".to_string()));
    }

    let request = LeaveRequest {
        id: uuid::Uuid::new_v4(),
        resident_id: req.resident_id,
        leave_type: req.leave_type,
        status: LeaveStatus::PendingAnalysis,
        start_date: req.start_date,
        end_date: req.end_date,
        requested_at: chrono::Utc::now(),
        analysis_report_id: None,
    };

    state.store.put_leave_request(request.clone()).await.map_err(store_error)?;

    tracing::info!(
        resident_id = %request.resident_id,
        request_id = %request.id,
        "leave request analysis started"
    );

    let report = rotasched_engine::analyze_leave_request(state.store.as_ref(), &request, chrono::Utc::now().date_naive())
        .await
        .map_err(|e| DomainError::AnalysisFailed(e.to_string()))?;

    let new_status = match report.recommendation {
        rotasched_domain::Recommendation::Approve => LeaveStatus::PendingApproval,
        rotasched_domain::Recommendation::FlaggedForReview => LeaveStatus::FlaggedForReview,
        rotasched_domain::Recommendation::Deny => LeaveStatus::Denied,
    };

    state
        .store
        .record_leave_analysis(report.clone(), new_status)
        .await
        .map_err(store_error)?;

    tracing::info!(
        request_id = %request.id,
        recommendation = ?report.recommendation,
        "leave request analysis completed"
    );

    Ok(Json(LeaveRequestResponse {
        request: LeaveRequest { status: new_status, analysis_report_id: Some(report.id), ..request },
        analysis: report,
    }))
}

fn store_error(err: rotasched_storage::StorageError) -> DomainError {
    DomainError::Internal(anyhow::anyhow!(err))
}
